// API key endpoints: `/api-keys`
//
// Keys authenticate sensor devices against the ingestion endpoints.
// The secret is only ever returned by `create_api_key`.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ApiKey, ApiKeyCreate, ApiKeyList, ApiKeyWithSecret, Id, Page};

impl ApiClient {
    pub async fn list_api_keys(&self, page: Page) -> Result<ApiKeyList, Error> {
        self.get_with_params(&["api-keys", ""], &page.params()).await
    }

    /// Keys issued to one device.
    pub async fn list_device_api_keys(&self, device_id: Id) -> Result<ApiKeyList, Error> {
        self.get(&["api-keys", "device", &device_id.to_string()])
            .await
    }

    pub async fn create_api_key(&self, key: &ApiKeyCreate) -> Result<ApiKeyWithSecret, Error> {
        self.post(&["api-keys", ""], key).await
    }

    /// Deactivate a key without deleting it. Returns the updated key.
    pub async fn revoke_api_key(&self, id: Id) -> Result<ApiKey, Error> {
        self.post_empty(&["api-keys", &id.to_string(), "revoke"])
            .await
    }

    pub async fn delete_api_key(&self, id: Id) -> Result<(), Error> {
        self.delete(&["api-keys", &id.to_string()]).await
    }
}
