// ── Login / logout ──

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::info;
use wxdeck_api::ApiClient;

use super::tracked::{StateCell, Status, impl_has_status};
use crate::error::CoreError;
use crate::session::{AuthUser, Session};

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub status: Status,
}

impl_has_status!(AuthState);

pub struct AuthStore {
    api: Arc<ApiClient>,
    session: Arc<Session>,
    state: StateCell<AuthState>,
}

impl AuthStore {
    pub(crate) fn new(api: Arc<ApiClient>, session: Arc<Session>) -> Self {
        Self {
            api,
            session,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
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

    /// Exchange credentials for a token and start a session with it.
    ///
    /// A token the session refuses (already expired, unreadable claims)
    /// fails with [`CoreError::SessionExpired`].
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthUser, CoreError> {
        let call = async {
            let token = self.api.login(email, password).await?;
            if !self.session.set_token(token.access_token)? {
                return Err(CoreError::SessionExpired);
            }
            self.session.user().ok_or(CoreError::SessionExpired)
        };
        let user = self.state.track("login", call, |_, _| {}).await?;
        info!(email = %user.email, "logged in");
        Ok(user)
    }

    /// End the session. Returns whether one was active.
    pub fn logout(&self) -> bool {
        let had = self.session.clear_auth();
        if had {
            info!("logged out");
        }
        had
    }
}
