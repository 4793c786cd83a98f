// ── Console facade ──
//
// Built once at process start. Owns the API client, session, navigator
// and toast list, and hands out state containers that share them.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, warn};
use wxdeck_api::{ApiClient, AuthHook};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::notify::Notifications;
use crate::router::{Location, Navigator};
use crate::session::{AuthUser, Session, TokenStore};
use crate::store::{
    ApiKeysStore, AuthStore, DeviceDetailStore, DevicesStore, SettingsStore, UsersStore,
    WeatherStore,
};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    api: Arc<ApiClient>,
    session: Arc<Session>,
    navigator: Arc<Navigator>,
    notifications: Notifications,
}

/// Connects the client's token lookups and 401 reports to the session.
struct SessionHook {
    session: Arc<Session>,
    navigator: Arc<Navigator>,
}

impl AuthHook for SessionHook {
    fn bearer_token(&self) -> Option<SecretString> {
        self.session.init_from_storage();
        self.session.token()
    }

    fn on_unauthorized(&self) {
        if self.session.clear_auth() {
            warn!("backend rejected the session token");
        }
        self.navigator.redirect_to_login();
    }
}

impl Console {
    /// Build the client and session. Nothing is sent and storage is not
    /// read until the first navigation or request.
    pub fn new(config: ConsoleConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let session = Arc::new(Session::new(tokens));
        let navigator = Arc::new(Navigator::new(Arc::clone(&session)));
        let hook = Arc::new(SessionHook {
            session: Arc::clone(&session),
            navigator: Arc::clone(&navigator),
        });

        let api = ApiClient::new(config.api_url.as_str(), &config.transport())?.with_auth_hook(hook);
        debug!(api_url = %api.base_url(), "console ready");

        Ok(Self {
            inner: Arc::new(ConsoleInner {
                config,
                api: Arc::new(api),
                session,
                navigator,
                notifications: Notifications::new(),
            }),
        })
    }

    // ── Shared services ──────────────────────────────────────────────

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.inner.api
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.inner.navigator
    }

    pub fn notifications(&self) -> &Notifications {
        &self.inner.notifications
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.session.init_from_storage();
        self.inner.session.user()
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Navigate to `path` and fail if the guard denies access.
    pub fn navigate(&self, path: &str) -> Result<Location, CoreError> {
        self.inner.navigator.push(path).into_result()
    }

    // ── State containers ─────────────────────────────────────────────

    pub fn auth(&self) -> AuthStore {
        AuthStore::new(Arc::clone(&self.inner.api), Arc::clone(&self.inner.session))
    }

    pub fn devices(&self) -> DevicesStore {
        DevicesStore::new(Arc::clone(&self.inner.api))
    }

    pub fn device_detail(&self) -> DeviceDetailStore {
        DeviceDetailStore::new(Arc::clone(&self.inner.api))
    }

    pub fn api_keys(&self) -> ApiKeysStore {
        ApiKeysStore::new(Arc::clone(&self.inner.api))
    }

    pub fn users(&self) -> UsersStore {
        UsersStore::new(Arc::clone(&self.inner.api))
    }

    pub fn settings(&self) -> SettingsStore {
        SettingsStore::new(Arc::clone(&self.inner.api))
    }

    pub fn weather(&self) -> WeatherStore {
        WeatherStore::new(Arc::clone(&self.inner.api))
    }

    /// End the session and move to the login route.
    pub fn logout(&self) -> bool {
        self.inner.session.init_from_storage();
        let had = self.auth().logout();
        self.inner.navigator.push("/login");
        had
    }
}
