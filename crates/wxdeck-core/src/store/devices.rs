// ── Device list ──

use std::sync::Arc;

use tokio::sync::watch;
use wxdeck_api::ApiClient;
use wxdeck_api::models::{Device, DeviceCreate, DeviceList, DeviceUpdate, Id, Page};

use super::collection::Collection;
use super::tracked::{StateCell, Status, impl_has_status};
use crate::error::CoreError;

#[derive(Debug, Clone, Default)]
pub struct DevicesState {
    pub devices: Collection<Id, Device>,
    /// Backend-side count across all pages.
    pub total: u64,
    pub status: Status,
}

impl_has_status!(DevicesState);

/// Paginated device list with create/update/delete.
pub struct DevicesStore {
    api: Arc<ApiClient>,
    state: StateCell<DevicesState>,
}

impl DevicesStore {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> DevicesState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<DevicesState> {
        self.state.subscribe()
    }

    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.state.snapshot().devices.to_vec()
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

    pub async fn fetch_devices(&self, page: Page) -> Result<DeviceList, CoreError> {
        self.state
            .track("fetch_devices", self.api.list_devices(page), |s, list| {
                s.devices
                    .replace_all(list.devices.iter().map(|d| (d.id, d.clone())));
                s.total = list.total;
            })
            .await
    }

    pub async fn create_device(&self, device: &DeviceCreate) -> Result<Device, CoreError> {
        self.state
            .track("create_device", self.api.create_device(device), |s, d| {
                s.devices.upsert(d.id, d.clone());
                s.total += 1;
            })
            .await
    }

    pub async fn update_device(&self, id: Id, update: &DeviceUpdate) -> Result<Device, CoreError> {
        self.state
            .track("update_device", self.api.update_device(id, update), |s, d| {
                s.devices.replace(&id, d.clone());
            })
            .await
    }

    pub async fn delete_device(&self, id: Id) -> Result<(), CoreError> {
        self.state
            .track("delete_device", self.api.delete_device(id), |s, ()| {
                s.devices.remove(&id);
                s.total = s.total.saturating_sub(1);
            })
            .await
    }
}
