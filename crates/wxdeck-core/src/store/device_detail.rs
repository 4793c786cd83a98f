// ── Single device with its API keys ──
//
// Key operations do not raise the loading flag: they run while the device
// itself stays on screen.

use std::sync::Arc;

use tokio::sync::watch;
use wxdeck_api::ApiClient;
use wxdeck_api::models::{
    ApiKey, ApiKeyCreate, ApiKeyList, ApiKeyWithSecret, Device, DeviceCreate, DeviceUpdate, Id,
};

use super::collection::Collection;
use super::tracked::{StateCell, Status, impl_has_status};
use crate::error::CoreError;

#[derive(Debug, Clone, Default)]
pub struct DeviceDetailState {
    pub device: Option<Arc<Device>>,
    pub api_keys: Collection<Id, ApiKey>,
    pub status: Status,
}

impl_has_status!(DeviceDetailState);

pub struct DeviceDetailStore {
    api: Arc<ApiClient>,
    state: StateCell<DeviceDetailState>,
}

impl DeviceDetailStore {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> DeviceDetailState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<DeviceDetailState> {
        self.state.subscribe()
    }

    pub fn device(&self) -> Option<Arc<Device>> {
        self.state.snapshot().device
    }

    pub fn api_keys(&self) -> Vec<Arc<ApiKey>> {
        self.state.snapshot().api_keys.to_vec()
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

    /// Forget the device, its keys and any error.
    pub fn clear(&self) {
        self.state.update(|s| {
            s.device = None;
            s.api_keys.clear();
            s.status.last_error = None;
        });
    }

    // ── Device operations ────────────────────────────────────────────

    pub async fn fetch_device(&self, id: Id) -> Result<Device, CoreError> {
        self.state
            .track("fetch_device", self.api.get_device(id), |s, d| {
                s.device = Some(Arc::new(d.clone()));
            })
            .await
    }

    pub async fn create_device(&self, device: &DeviceCreate) -> Result<Device, CoreError> {
        self.state
            .track("create_device", self.api.create_device(device), |s, d| {
                s.device = Some(Arc::new(d.clone()));
            })
            .await
    }

    pub async fn update_device(&self, id: Id, update: &DeviceUpdate) -> Result<Device, CoreError> {
        self.state
            .track("update_device", self.api.update_device(id, update), |s, d| {
                s.device = Some(Arc::new(d.clone()));
            })
            .await
    }

    pub async fn delete_device(&self, id: Id) -> Result<(), CoreError> {
        self.state
            .track("delete_device", self.api.delete_device(id), |s, ()| {
                s.device = None;
            })
            .await
    }

    // ── Key operations ───────────────────────────────────────────────

    pub async fn fetch_api_keys(&self, device_id: Id) -> Result<ApiKeyList, CoreError> {
        self.state
            .track_quiet(
                "fetch_api_keys",
                self.api.list_device_api_keys(device_id),
                |s, list| {
                    s.api_keys
                        .replace_all(list.api_keys.iter().map(|k| (k.id, k.clone())));
                },
            )
            .await
    }

    /// Issue a key for `device_id`. The secret is in the return value only;
    /// the held list keeps the key without it.
    pub async fn generate_api_key(
        &self,
        device_id: Id,
        name: &str,
    ) -> Result<ApiKeyWithSecret, CoreError> {
        let request = ApiKeyCreate {
            name: name.to_owned(),
            device_id,
        };
        self.state
            .track_quiet("generate_api_key", self.api.create_api_key(&request), |s, k| {
                s.api_keys.upsert(k.key.id, k.key.clone());
            })
            .await
    }

    pub async fn revoke_api_key(&self, key_id: Id) -> Result<ApiKey, CoreError> {
        self.state
            .track_quiet("revoke_api_key", self.api.revoke_api_key(key_id), |s, k| {
                s.api_keys.replace(&key_id, k.clone());
            })
            .await
    }

    pub async fn delete_api_key(&self, key_id: Id) -> Result<(), CoreError> {
        self.state
            .track_quiet("delete_api_key", self.api.delete_api_key(key_id), |s, ()| {
                s.api_keys.remove(&key_id);
            })
            .await
    }
}
