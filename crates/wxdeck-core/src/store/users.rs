// ── User accounts ──

use std::sync::Arc;

use tokio::sync::watch;
use wxdeck_api::ApiClient;
use wxdeck_api::models::{Id, Page, User, UserCreate, UserList, UserUpdate};

use super::collection::Collection;
use super::tracked::{StateCell, Status, impl_has_status};
use crate::error::CoreError;

#[derive(Debug, Clone, Default)]
pub struct UsersState {
    pub users: Collection<Id, User>,
    /// The user opened for viewing or editing.
    pub current: Option<Arc<User>>,
    pub total: u64,
    pub status: Status,
}

impl_has_status!(UsersState);

impl UsersState {
    fn sync_current(&mut self, id: Id, user: Option<&User>) {
        if self.current.as_ref().is_some_and(|c| c.id == id) {
            self.current = user.map(|u| Arc::new(u.clone()));
        }
    }
}

pub struct UsersStore {
    api: Arc<ApiClient>,
    state: StateCell<UsersState>,
}

impl UsersStore {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> UsersState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<UsersState> {
        self.state.subscribe()
    }

    pub fn users(&self) -> Vec<Arc<User>> {
        self.state.snapshot().users.to_vec()
    }

    pub fn current(&self) -> Option<Arc<User>> {
        self.state.snapshot().current
    }

    pub fn total(&self) -> u64 {
        self.state.snapshot().total
    }

    pub fn loading(&self) -> bool {
        self.state.snapshot().status.loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.snapshot().status.last_error
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    pub fn clear_current(&self) {
        self.state.update(|s| s.current = None);
    }

    // ── Operations ───────────────────────────────────────────────────

    pub async fn fetch_users(&self, page: Page) -> Result<UserList, CoreError> {
        self.state
            .track("fetch_users", self.api.list_users(page), |s, list| {
                s.users
                    .replace_all(list.users.iter().map(|u| (u.id, u.clone())));
                s.total = list.total;
            })
            .await
    }

    pub async fn fetch_user(&self, id: Id) -> Result<User, CoreError> {
        self.state
            .track("fetch_user", self.api.get_user(id), |s, u| {
                s.current = Some(Arc::new(u.clone()));
            })
            .await
    }

    pub async fn create_user(&self, user: &UserCreate) -> Result<User, CoreError> {
        self.state
            .track("create_user", self.api.create_user(user), |s, u| {
                s.users.upsert(u.id, u.clone());
                s.total += 1;
            })
            .await
    }

    pub async fn update_user(&self, id: Id, update: &UserUpdate) -> Result<User, CoreError> {
        self.state
            .track("update_user", self.api.update_user(id, update), |s, u| {
                s.users.replace(&id, u.clone());
                s.sync_current(id, Some(u));
            })
            .await
    }

    pub async fn delete_user(&self, id: Id) -> Result<(), CoreError> {
        self.state
            .track("delete_user", self.api.delete_user(id), |s, ()| {
                s.users.remove(&id);
                s.total = s.total.saturating_sub(1);
                s.sync_current(id, None);
            })
            .await
    }
}
