// User endpoints: `/users`

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Id, Page, User, UserCreate, UserList, UserUpdate};

impl ApiClient {
    pub async fn list_users(&self, page: Page) -> Result<UserList, Error> {
        self.get_with_params(&["users", ""], &page.params()).await
    }

    pub async fn get_user(&self, id: Id) -> Result<User, Error> {
        self.get(&["users", &id.to_string()]).await
    }

    /// The account the current token belongs to.
    pub async fn get_current_user(&self) -> Result<User, Error> {
        self.get(&["users", "me"]).await
    }

    pub async fn create_user(&self, user: &UserCreate) -> Result<User, Error> {
        self.post(&["users", ""], user).await
    }

    pub async fn update_user(&self, id: Id, update: &UserUpdate) -> Result<User, Error> {
        self.put(&["users", &id.to_string()], update).await
    }

    pub async fn delete_user(&self, id: Id) -> Result<(), Error> {
        self.delete(&["users", &id.to_string()]).await
    }
}
