// Setting endpoints: `/settings`
//
// Settings are keyed by name rather than a numeric id. Keys are pushed as
// single path segments, so they are percent-encoded as needed.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Setting, SettingUpdate};

impl ApiClient {
    pub async fn list_settings(&self) -> Result<Vec<Setting>, Error> {
        self.get(&["settings", ""]).await
    }

    pub async fn get_setting(&self, key: &str) -> Result<Setting, Error> {
        self.get(&["settings", key]).await
    }

    /// Set a value. The backend upserts, so unknown keys are created.
    pub async fn update_setting(&self, key: &str, update: &SettingUpdate) -> Result<Setting, Error> {
        self.put(&["settings", key], update).await
    }
}
