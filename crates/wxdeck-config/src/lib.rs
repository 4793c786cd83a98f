//! Shared configuration for wxdeck front ends.
//!
//! TOML profiles, token persistence (keyring or file), and translation to
//! `wxdeck_core::ConsoleConfig`. The CLI layers flag overrides on top.

mod tokens;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use wxdeck_core::{ConsoleConfig, DEFAULT_API_URL, MemoryTokenStore, TlsVerification, TokenStore};

pub use tokens::{FileTokenStore, KeyringTokenStore};

/// Prefix for environment overrides, e.g. `WXDECK_DEFAULTS__TIMEOUT=30`.
pub const ENV_PREFIX: &str = "WXDECK_";

/// Points the CLI at a different config file.
pub const CONFIG_ENV: &str = "WXDECK_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use, honouring an explicit choice first.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile. The `default` profile always exists implicitly.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(p) => Ok(p.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// Where a profile keeps its bearer token between runs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TokenStoreKind {
    /// System keyring (Keychain, Secret Service, Credential Manager).
    #[default]
    Keyring,
    /// A file in the platform data directory, readable by the owner only.
    File,
    /// Not persisted: every run starts logged out.
    Memory,
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL including the version prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Account to log in as when `--email` is not given.
    pub email: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the default insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override the default timeout (seconds).
    pub timeout: Option<u64>,

    #[serde(default)]
    pub token_store: TokenStoreKind,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            email: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            token_store: TokenStoreKind::default(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "wxdeck", "wxdeck")
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("wxdeck");
    p
}

/// Resolve the config file path: `$WXDECK_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding file-backed tokens.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` (if it exists), then `WXDECK_*` variables.
/// Nested keys use a double underscore: `WXDECK_PROFILES__LAB__API_URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to runtime types ────────────────────────────────────

/// Build a `ConsoleConfig` from a profile plus global defaults.
pub fn profile_to_console_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{e}: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ConsoleConfig {
        api_url,
        tls,
        timeout,
    })
}

/// Open the token store a profile asks for.
pub fn open_token_store(
    profile_name: &str,
    kind: TokenStoreKind,
) -> Result<Arc<dyn TokenStore>, ConfigError> {
    Ok(match kind {
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new(profile_name)?),
        TokenStoreKind::File => Arc::new(FileTokenStore::for_profile(profile_name)),
        TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.profile_name(None), "default");
        assert_eq!(cfg.profile("default").unwrap().api_url, DEFAULT_API_URL);
    }

    #[test]
    fn profiles_round_trip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.default_profile = Some("lab".into());
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                api_url: "https://wx.lab.example/api/v1".into(),
                email: Some("ops@example.com".into()),
                timeout: Some(20),
                token_store: TokenStoreKind::File,
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profile_name(None), "lab");
        assert_eq!(loaded.profile("lab").unwrap(), cfg.profiles["lab"]);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile("staging"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_overrides_defaults() {
        let defaults = Defaults {
            insecure: true,
            timeout: 5,
            ..Defaults::default()
        };
        let strict = Profile {
            insecure: Some(false),
            ca_cert: Some("/etc/wx/ca.pem".into()),
            timeout: Some(42),
            ..Profile::default()
        };

        let cc = profile_to_console_config(&strict, &defaults).unwrap();
        assert_eq!(cc.tls, TlsVerification::CustomCa("/etc/wx/ca.pem".into()));
        assert_eq!(cc.timeout, Duration::from_secs(42));

        let loose = profile_to_console_config(&Profile::default(), &defaults).unwrap();
        assert_eq!(loose.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(loose.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_api_url_is_rejected() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_console_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
    }
}
