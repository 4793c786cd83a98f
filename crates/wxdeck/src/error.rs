//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use wxdeck_config::ConfigError;
use wxdeck_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(wxdeck::connection_failed),
        help(
            "{reason}\n\
             Check that the backend is running and the profile's api_url is right.\n\
             Try: wxdeck health"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(wxdeck::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(wxdeck::auth_failed),
        help("Check the email and password, then run: wxdeck login")
    )]
    AuthFailed { message: String },

    #[error("Not logged in")]
    #[diagnostic(
        code(wxdeck::not_logged_in),
        help("Run: wxdeck login\nThen retry to open {redirect}")
    )]
    NotLoggedIn { redirect: String },

    #[error("Session expired")]
    #[diagnostic(code(wxdeck::session_expired), help("Run: wxdeck login"))]
    SessionExpired,

    #[error("Access to {path} requires the admin role")]
    #[diagnostic(
        code(wxdeck::forbidden),
        help("Log in with an administrator account: wxdeck logout && wxdeck login")
    )]
    Forbidden { path: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(code(wxdeck::permission_denied))]
    PermissionDenied { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(wxdeck::not_found))]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(wxdeck::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wxdeck::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wxdeck::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: wxdeck config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(wxdeck::config), help("Inspect it with: wxdeck config show"))]
    Config { message: String },

    #[error("Token storage error: {message}")]
    #[diagnostic(
        code(wxdeck::token_storage),
        help("Set token_store = \"file\" on the profile if no keyring is available.")
    )]
    Storage { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(wxdeck::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("Failed to render output: {0}")]
    #[diagnostic(code(wxdeck::render))]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotLoggedIn { .. } | Self::SessionExpired => {
                exit_code::AUTH
            }
            Self::Forbidden { .. } | Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,

            CoreError::Api {
                message,
                status: Some(401),
            } => Self::AuthFailed { message },
            CoreError::Api {
                message,
                status: Some(403),
            } => Self::PermissionDenied { message },
            CoreError::Api {
                message,
                status: Some(404),
            } => Self::NotFound { message },
            CoreError::Api { message, status } => Self::ApiError { status, message },

            CoreError::SessionExpired => Self::SessionExpired,
            CoreError::NotAuthenticated { redirect } => Self::NotLoggedIn { redirect },
            CoreError::Forbidden { path } => Self::Forbidden { path },

            CoreError::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Storage { message } => Self::Storage { message },
            CoreError::Config { message } => Self::Config { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: "(see: wxdeck config profiles)".into(),
            },
            ConfigError::Keyring(e) => Self::Storage {
                message: e.to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_pick_exit_codes() {
        let cases = [
            (Some(401), exit_code::AUTH),
            (Some(403), exit_code::PERMISSION),
            (Some(404), exit_code::NOT_FOUND),
            (Some(500), exit_code::GENERAL),
            (None, exit_code::GENERAL),
        ];
        for (status, code) in cases {
            let err = CliError::from(CoreError::Api {
                message: "x".into(),
                status,
            });
            assert_eq!(err.exit_code(), code, "status {status:?}");
        }
    }

    #[test]
    fn guard_denials_map_to_auth_and_permission() {
        let not_logged_in = CliError::from(CoreError::NotAuthenticated {
            redirect: "/devices".into(),
        });
        assert_eq!(not_logged_in.exit_code(), exit_code::AUTH);

        let forbidden = CliError::from(CoreError::Forbidden {
            path: "/users".into(),
        });
        assert_eq!(forbidden.exit_code(), exit_code::PERMISSION);
    }

    #[test]
    fn transport_failures_map_to_connection_and_timeout() {
        let refused = CliError::from(CoreError::ConnectionFailed {
            url: "http://127.0.0.1:1".into(),
            reason: "refused".into(),
        });
        assert_eq!(refused.exit_code(), exit_code::CONNECTION);
        assert_eq!(CliError::from(CoreError::Timeout).exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn local_validation_is_a_usage_error() {
        let err = CliError::from(CoreError::Validation {
            message: "hours must be between 1 and 168".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
