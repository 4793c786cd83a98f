// ── Backend settings ──
//
// Settings are keyed by name and not paginated.

use std::sync::Arc;

use tokio::sync::watch;
use wxdeck_api::ApiClient;
use wxdeck_api::models::{Setting, SettingUpdate};

use super::collection::Collection;
use super::tracked::{StateCell, Status, impl_has_status};
use crate::error::CoreError;

#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    pub settings: Collection<String, Setting>,
    pub current: Option<Arc<Setting>>,
    pub status: Status,
}

impl_has_status!(SettingsState);

pub struct SettingsStore {
    api: Arc<ApiClient>,
    state: StateCell<SettingsState>,
}

impl SettingsStore {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> SettingsState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SettingsState> {
        self.state.subscribe()
    }

    pub fn settings(&self) -> Vec<Arc<Setting>> {
        self.state.snapshot().settings.to_vec()
    }

    pub fn current(&self) -> Option<Arc<Setting>> {
        self.state.snapshot().current
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

    pub async fn fetch_settings(&self) -> Result<Vec<Setting>, CoreError> {
        self.state
            .track("fetch_settings", self.api.list_settings(), |s, list| {
                s.settings
                    .replace_all(list.iter().map(|x| (x.key.clone(), x.clone())));
            })
            .await
    }

    pub async fn fetch_setting(&self, key: &str) -> Result<Setting, CoreError> {
        self.state
            .track("fetch_setting", self.api.get_setting(key), |s, x| {
                s.current = Some(Arc::new(x.clone()));
            })
            .await
    }

    pub async fn update_setting(&self, key: &str, value: &str) -> Result<Setting, CoreError> {
        let update = SettingUpdate {
            value: value.to_owned(),
        };
        self.state
            .track("update_setting", self.api.update_setting(key, &update), |s, x| {
                let key = key.to_owned();
                s.settings.replace(&key, x.clone());
                if s.current.as_ref().is_some_and(|c| c.key == key) {
                    s.current = Some(Arc::new(x.clone()));
                }
            })
            .await
    }
}
