// ── Core error types ──
//
// User-facing errors from wxdeck-core. Callers never match on reqwest or
// serde failures directly: the `From<wxdeck_api::Error>` impl folds
// transport-layer errors into a handful of domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend errors ───────────────────────────────────────────────
    /// The backend answered with an error, or the response was unusable.
    /// `message` is already normalized and never empty.
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if the backend answered at all).
        status: Option<u16>,
    },

    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Session errors ───────────────────────────────────────────────
    /// A token was rejected locally: undecodable, missing `exp`, or expired.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Navigation to a route that needs a session, without one.
    #[error("Not logged in")]
    NotAuthenticated {
        /// Where the login route was asked to return to.
        redirect: String,
    },

    /// Navigation to a route the current role may not open.
    #[error("Access to {path} requires a different role")]
    Forbidden { path: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("{message}")]
    Validation { message: String },

    #[error("Token storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// HTTP status carried by an [`Api`](Self::Api) error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The backend rejected the credentials, or no valid session exists.
    pub fn is_auth(&self) -> bool {
        self.status() == Some(401)
            || matches!(self, Self::SessionExpired | Self::NotAuthenticated { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wxdeck_api::Error> for CoreError {
    fn from(err: wxdeck_api::Error) -> Self {
        match err {
            wxdeck_api::Error::Unauthorized { message } => CoreError::Api {
                message,
                status: Some(401),
            },
            wxdeck_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            wxdeck_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: err.message(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            wxdeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            wxdeck_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            wxdeck_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("Unexpected response from backend: {message}"),
                status: None,
            },
            wxdeck_api::Error::InvalidInput(message) => CoreError::Validation { message },
        }
    }
}
