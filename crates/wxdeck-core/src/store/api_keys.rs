// ── Fleet-wide API key list ──

use std::sync::Arc;

use tokio::sync::watch;
use wxdeck_api::ApiClient;
use wxdeck_api::models::{ApiKey, ApiKeyCreate, ApiKeyList, ApiKeyWithSecret, Id, Page};

use super::collection::Collection;
use super::tracked::{StateCell, Status, impl_has_status};
use crate::error::CoreError;

#[derive(Debug, Clone, Default)]
pub struct ApiKeysState {
    pub api_keys: Collection<Id, ApiKey>,
    pub total: u64,
    pub status: Status,
}

impl_has_status!(ApiKeysState);

pub struct ApiKeysStore {
    api: Arc<ApiClient>,
    state: StateCell<ApiKeysState>,
}

impl ApiKeysStore {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> ApiKeysState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ApiKeysState> {
        self.state.subscribe()
    }

    pub fn api_keys(&self) -> Vec<Arc<ApiKey>> {
        self.state.snapshot().api_keys.to_vec()
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

    // ── Operations ───────────────────────────────────────────────────

    pub async fn fetch_api_keys(&self, page: Page) -> Result<ApiKeyList, CoreError> {
        self.state
            .track("fetch_api_keys", self.api.list_api_keys(page), |s, list| {
                s.api_keys
                    .replace_all(list.api_keys.iter().map(|k| (k.id, k.clone())));
                s.total = list.total;
            })
            .await
    }

    /// Narrow the held list to one device's keys.
    pub async fn fetch_device_api_keys(&self, device_id: Id) -> Result<ApiKeyList, CoreError> {
        self.state
            .track(
                "fetch_device_api_keys",
                self.api.list_device_api_keys(device_id),
                |s, list| {
                    s.api_keys
                        .replace_all(list.api_keys.iter().map(|k| (k.id, k.clone())));
                    s.total = list.total;
                },
            )
            .await
    }

    pub async fn create_api_key(&self, key: &ApiKeyCreate) -> Result<ApiKeyWithSecret, CoreError> {
        self.state
            .track("create_api_key", self.api.create_api_key(key), |s, k| {
                s.api_keys.upsert(k.key.id, k.key.clone());
                s.total += 1;
            })
            .await
    }

    pub async fn revoke_api_key(&self, id: Id) -> Result<ApiKey, CoreError> {
        self.state
            .track("revoke_api_key", self.api.revoke_api_key(id), |s, k| {
                s.api_keys.replace(&id, k.clone());
            })
            .await
    }

    pub async fn delete_api_key(&self, id: Id) -> Result<(), CoreError> {
        self.state
            .track("delete_api_key", self.api.delete_api_key(id), |s, ()| {
                s.api_keys.remove(&id);
                s.total = s.total.saturating_sub(1);
            })
            .await
    }
}
