// ── Runtime connection configuration ──
//
// Describes *where* and *how* to reach the backend. Never touches disk:
// the CLI resolves profiles and hands a `ConsoleConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;
use wxdeck_api::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab deployments).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API base URL, including the version prefix.
    pub api_url: Url,
    pub tls: TlsVerification,
    /// Client-wide request timeout.
    pub timeout: Duration,
}

impl ConsoleConfig {
    /// Strict TLS and the default timeout.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
