use thiserror::Error;

/// Fallback message when a failure carries nothing readable.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Top-level error type for the `wxdeck-api` crate.
///
/// Every failure the client can produce ends up here, whether the backend
/// answered with a non-2xx status or the request never completed. Callers
/// that only need the normalized view use [`message()`](Self::message) and
/// [`status()`](Self::status).
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP ────────────────────────────────────────────────────────
    /// The backend rejected the bearer token (HTTP 401).
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-2xx response. `message` is already extracted from
    /// the body's `detail` / `message` field when present.
    #[error("{message}")]
    Http { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request argument was rejected before anything was sent.
    #[error("{0}")]
    InvalidInput(String),
}

impl Error {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Human-readable message, never empty.
    pub fn message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            UNEXPECTED_ERROR.to_owned()
        } else {
            msg
        }
    }

    /// Returns `true` if the backend rejected our credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request timed out client-side.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if the backend could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_exposes_status_and_message() {
        let err = Error::Http {
            status: 404,
            message: "Device not found".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "Device not found");
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn empty_message_falls_back_to_generic_text() {
        let err = Error::Http {
            status: 500,
            message: "   ".into(),
        };
        assert_eq!(err.message(), UNEXPECTED_ERROR);
    }

    #[test]
    fn unauthorized_reports_401() {
        let err = Error::Unauthorized {
            message: "Could not validate credentials".into(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn input_errors_have_no_status() {
        let err = Error::InvalidInput("hours must be between 1 and 168".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), "hours must be between 1 and 168");
    }
}
