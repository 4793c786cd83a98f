// Durable token storage backends.
//
// Both stores keep exactly one token per profile under the fixed
// `auth_token` key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use wxdeck_core::{CoreError, TOKEN_KEY, TokenStore};

use crate::ConfigError;

const KEYRING_SERVICE: &str = "wxdeck";

fn storage_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::Storage {
        message: err.to_string(),
    }
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Token kept in the system keyring as `wxdeck` / `<profile>/auth_token`.
pub struct KeyringTokenStore {
    entry: keyring::Entry,
}

impl KeyringTokenStore {
    pub fn new(profile_name: &str) -> Result<Self, ConfigError> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{TOKEN_KEY}"))?;
        Ok(Self { entry })
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(storage_error(e)),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        self.entry
            .set_password(token.expose_secret())
            .map_err(storage_error)
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Token kept in a plain file, created with owner-only permissions.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/<profile>.token`
    pub fn for_profile(profile_name: &str) -> Self {
        Self::new(crate::data_dir().join(format!("{profile_name}.token")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        std::io::Write::write_all(&mut file, contents.as_bytes())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| SecretString::from(token.to_owned())))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(e)),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        debug!(path = %self.path.display(), "writing token file");
        self.write(token.expose_secret()).map_err(storage_error)
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens").join("lab.token"));

        assert!(store.load().unwrap().is_none());
        store.save(&SecretString::from("abc.def.ghi")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "abc.def.ghi");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn blank_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.token");
        std::fs::write(&path, "\n").unwrap();
        assert!(FileTokenStore::new(path).load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("default.token"));
        store.save(&SecretString::from("t")).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
