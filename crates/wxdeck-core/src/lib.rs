//! Session, routing and reactive state between `wxdeck-api` and front ends.
//!
//! - **[`Console`]**: facade built once per process from a
//!   [`ConsoleConfig`] and a [`TokenStore`]. Owns the [`ApiClient`]
//!   (re-exported from `wxdeck-api`), the [`Session`], the [`Navigator`]
//!   and the [`Notifications`] list, and vends state containers.
//!
//! - **[`Session`]**: bearer token plus the user decoded from its claims.
//!   Claims are read without verifying the signature ([`jwt`]); they only
//!   decide what the client offers, the backend still checks every call.
//!   A 401 from any request clears the session and sends the navigator to
//!   the login route exactly once.
//!
//! - **[`router`]**: static route table with per-route access metadata and
//!   a deterministic navigation guard.
//!
//! - **[`store`]**: one container per resource (`DevicesStore`,
//!   `UsersStore`, ...). Each publishes `{data, loading, last_error}` on a
//!   `tokio::sync::watch` channel and updates it in one step per call.

pub mod config;
pub mod console;
pub mod error;
pub mod jwt;
pub mod notify;
pub mod router;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, DEFAULT_API_URL, TlsVerification};
pub use console::Console;
pub use error::CoreError;
pub use notify::{Notifications, Toast, ToastKind};
pub use router::{Location, Navigation, Navigator, RedirectReason, Route, View};
pub use session::{AuthUser, MemoryTokenStore, Session, SessionState, TOKEN_KEY, TokenStore};
pub use store::{
    ApiKeysStore, AuthStore, Collection, DeviceDetailStore, DevicesStore, SettingsStore, Status,
    UsersStore, WeatherStore,
};

pub use wxdeck_api::{ApiClient, models};
