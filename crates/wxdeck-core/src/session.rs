// ── Session store ──
//
// Holds the bearer token and the user decoded from it. Every mutation is a
// single `watch` update, so observers never see a token without its user.
// Persistence sits behind `TokenStore` so the CLI can pick keyring or file
// storage while tests stay in memory.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use wxdeck_api::models::{Id, UserRole};

use crate::error::CoreError;
use crate::jwt::Claims;

/// Fixed key the token is persisted under.
pub const TOKEN_KEY: &str = "auth_token";

// ── Token persistence ────────────────────────────────────────────────

/// Durable storage for a single bearer token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<SecretString>, CoreError>;
    fn save(&self, token: &SecretString) -> Result<(), CoreError>;
    /// Remove the stored token. Removing a missing token is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// Process-local token storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `token` already stored, as if saved by an earlier run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

// ── Session state ────────────────────────────────────────────────────

/// The logged-in user as described by the token's claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: Id,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub token: Option<SecretString>,
    pub user: Option<AuthUser>,
    /// Whether storage has been consulted yet.
    pub initialized: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// Owner of the current token and user.
///
/// Expiry is only checked when a token is decoded. A token that expires
/// mid-session is discovered when the backend answers 401.
pub struct Session {
    state: watch::Sender<SessionState>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { state, store }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<SecretString> {
        self.state.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Adopt a freshly issued token.
    ///
    /// Returns `Ok(false)` when the token is undecodable, has no `exp`, or
    /// is already expired; the session is then cleared and nothing is
    /// persisted. The token is persisted before the session is adopted:
    /// if saving fails, any previous session is cleared as well and the
    /// storage error is returned, so an `Err` never leaves the caller
    /// authenticated.
    pub fn set_token(&self, token: SecretString) -> Result<bool, CoreError> {
        let Some(user) = Self::validate(&token) else {
            self.clear_auth();
            self.mark_initialized();
            return Ok(false);
        };

        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "could not persist token, session not started");
            self.clear_auth();
            self.mark_initialized();
            return Err(e);
        }

        info!(user_id = user.id, role = %user.role, "session started");
        self.state.send_modify(|s| {
            s.token = Some(token);
            s.user = Some(user);
            s.initialized = true;
        });
        Ok(true)
    }

    /// Restore a persisted token, once. Later calls do nothing.
    pub fn init_from_storage(&self) {
        let first = self.state.send_if_modified(|s| {
            let first = !s.initialized;
            s.initialized = true;
            first
        });
        if !first {
            return;
        }

        let stored = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "could not read stored token");
                return;
            }
        };

        match Self::validate(&stored) {
            Some(user) => {
                debug!(user_id = user.id, "restored session from storage");
                self.state.send_modify(|s| {
                    s.token = Some(stored);
                    s.user = Some(user);
                });
            }
            None => {
                debug!("stored token is unusable, discarding");
                self.clear_auth();
            }
        }
    }

    /// Drop the token and user and forget the persisted token.
    ///
    /// Returns `true` if a session was active. Safe to call repeatedly.
    pub fn clear_auth(&self) -> bool {
        let had_session = self.state.send_if_modified(|s| {
            let had = s.token.is_some() || s.user.is_some();
            s.token = None;
            s.user = None;
            had
        });
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "could not remove stored token");
        }
        if had_session {
            info!("session cleared");
        }
        had_session
    }

    fn mark_initialized(&self) {
        self.state.send_if_modified(|s| !std::mem::replace(&mut s.initialized, true));
    }

    fn validate(token: &SecretString) -> Option<AuthUser> {
        match Claims::decode(token.expose_secret()) {
            Ok(claims) if !claims.is_expired_at(Utc::now()) => Some(claims.to_user()),
            Ok(_) => {
                debug!("token is expired or has no expiry");
                None
            }
            Err(e) => {
                debug!(error = %e, "token payload could not be decoded");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::jwt::tests::{expired_token, valid_token};

    fn session_with(store: &Arc<MemoryTokenStore>) -> Session {
        Session::new(Arc::clone(store) as Arc<dyn TokenStore>)
    }

    #[test]
    fn valid_token_authenticates_and_persists() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = session_with(&store);

        assert!(session.set_token(SecretString::from(valid_token("admin"))).unwrap());

        assert!(session.is_authenticated());
        let user = session.user().unwrap();
        assert_eq!(user.id, 7);
        assert!(user.is_admin());
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn expired_token_never_authenticates() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = session_with(&store);

        assert!(!session.set_token(SecretString::from(expired_token())).unwrap());

        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn garbage_token_clears_existing_session() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = session_with(&store);
        session.set_token(SecretString::from(valid_token("user"))).unwrap();

        assert!(!session.set_token(SecretString::from("garbage")).unwrap());
        assert!(!session.is_authenticated());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn role_defaults_to_user() {
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        let token = crate::jwt::tests::token_with(&serde_json::json!({
            "sub": "2",
            "exp": 4_102_444_800_i64,
        }));
        session.set_token(SecretString::from(token)).unwrap();
        assert_eq!(session.user().unwrap().role, UserRole::User);
    }

    #[test]
    fn init_restores_stored_token_once() {
        let store = Arc::new(MemoryTokenStore::with_token(valid_token("user")));
        let session = session_with(&store);

        session.init_from_storage();
        assert!(session.is_authenticated());

        session.clear_auth();
        store.save(&SecretString::from(valid_token("admin"))).unwrap();
        session.init_from_storage();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn init_discards_expired_stored_token() {
        let store = Arc::new(MemoryTokenStore::with_token(expired_token()));
        let session = session_with(&store);

        session.init_from_storage();

        assert!(session.is_initialized());
        assert!(!session.is_authenticated());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clear_auth_reports_whether_session_existed() {
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        session.set_token(SecretString::from(valid_token("user"))).unwrap();

        assert!(session.clear_auth());
        assert!(!session.clear_auth());
    }

    struct ReadOnlyStore;

    impl TokenStore for ReadOnlyStore {
        fn load(&self) -> Result<Option<SecretString>, CoreError> {
            Ok(None)
        }
        fn save(&self, _token: &SecretString) -> Result<(), CoreError> {
            Err(CoreError::Storage {
                message: "no secret service".into(),
            })
        }
        fn clear(&self) -> Result<(), CoreError> {
            Ok(())
        }
    }

    #[test]
    fn failed_save_leaves_no_session() {
        let session = Session::new(Arc::new(ReadOnlyStore));

        let err = session
            .set_token(SecretString::from(valid_token("admin")))
            .unwrap_err();

        assert!(matches!(err, CoreError::Storage { .. }));
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.is_initialized());
    }

    #[test]
    fn subscribers_see_user_and_token_together() {
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        let rx = session.subscribe();

        session.set_token(SecretString::from(valid_token("user"))).unwrap();

        let state = rx.borrow().clone();
        assert!(state.token.is_some());
        assert!(state.user.is_some());
    }
}
