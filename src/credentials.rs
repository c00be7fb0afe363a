//! Persistent storage for the bearer token and authenticated user id.
//!
//! The store keeps a small JSON object at `~/.config/osm-tools/osm.json` and
//! only the named fields are ever persisted. Persistence is explicit: callers
//! mutate a loaded [`Credentials`] value and call [`CredentialStore::save`]
//! at auditable points, rather than relying on ambient auto-save.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory name under the user config directory shared by the osm tools.
const CONFIG_DIR: &str = "osm-tools";

/// File name of the credential store inside [`CONFIG_DIR`].
const CONFIG_FILE: &str = "osm.json";

/// Stored OAuth token and user id.
///
/// The token carries no tracked expiry; it is reused until the operator
/// removes it from the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Cached bearer token, if a login has completed.
    pub token: Option<String>,
    /// Numeric id of the authenticated user, once fetched.
    pub uid: Option<u64>,
}

/// Errors surfaced by the credential store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The user's home/config directory could not be determined.
    #[error("could not determine the user config directory")]
    MissingConfigDir,

    /// A path under the config directory was not valid UTF-8.
    #[error("config path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// Reading or writing the store file failed.
    #[error("credential store I/O failed at {path}: {message}")]
    Io {
        /// Store file path.
        path: Utf8PathBuf,
        /// Underlying I/O error detail.
        message: String,
    },

    /// The store file held malformed JSON.
    #[error("credential store at {path} is malformed: {message}")]
    Malformed {
        /// Store file path.
        path: Utf8PathBuf,
        /// Deserialization error detail.
        message: String,
    },
}

/// Load/save boundary for [`Credentials`], mockable in tests.
pub trait CredentialStore {
    /// Loads the stored credentials, defaulting when no store exists yet.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] when the store exists but cannot be read
    /// or parsed.
    fn load(&self) -> Result<Credentials, CredentialError>;

    /// Persists the credentials, replacing the whole file.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] when serialization or the write fails.
    fn save(&self, credentials: &Credentials) -> Result<(), CredentialError>;
}

/// File-backed credential store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Utf8PathBuf,
}

impl JsonFileStore {
    /// Creates a store at an explicit path (used by tests).
    #[must_use]
    pub const fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    /// Opens the store at the conventional per-user location, creating the
    /// parent directory when missing.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] when the config directory cannot be
    /// determined or created.
    pub fn open_default() -> Result<Self, CredentialError> {
        let base = dirs::config_dir().ok_or(CredentialError::MissingConfigDir)?;
        let base = Utf8PathBuf::from_path_buf(base).map_err(|raw| CredentialError::NonUtf8Path {
            path: raw.display().to_string(),
        })?;
        let folder = base.join(CONFIG_DIR);
        fs::create_dir_all(&folder).map_err(|error| CredentialError::Io {
            path: folder.clone(),
            message: error.to_string(),
        })?;
        Ok(Self::new(folder.join(CONFIG_FILE)))
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl CredentialStore for JsonFileStore {
    fn load(&self) -> Result<Credentials, CredentialError> {
        if !self.path.exists() {
            return Ok(Credentials::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(|error| CredentialError::Io {
            path: self.path.clone(),
            message: error.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|error| CredentialError::Malformed {
            path: self.path.clone(),
            message: error.to_string(),
        })
    }

    fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        let json =
            serde_json::to_string_pretty(credentials).map_err(|error| CredentialError::Io {
                path: self.path.clone(),
                message: error.to_string(),
            })?;
        fs::write(&self.path, json).map_err(|error| CredentialError::Io {
            path: self.path.clone(),
            message: error.to_string(),
        })
    }
}
