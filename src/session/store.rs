// Credential persistence
// The file store mirrors the browser cookies: two named values, owner-only access

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{ClientError, Result};

/// Serialized form of the credential pair
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl StoredCredentials {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Where the session keeps its tokens between runs
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<StoredCredentials>;
    fn save(&self, credentials: &StoredCredentials) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Keeps credentials for the lifetime of the process only
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoredCredentials>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token pair
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        Self {
            inner: Mutex::new(StoredCredentials {
                access_token: access.map(str::to_string),
                refresh_token: refresh.map(str::to_string),
            }),
        }
    }

    pub fn snapshot(&self) -> StoredCredentials {
        self.inner.lock().clone()
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<StoredCredentials> {
        Ok(self.inner.lock().clone())
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        *self.inner.lock() = credentials.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock() = StoredCredentials::default();
        Ok(())
    }
}

/// JSON file on disk, created with mode 0600 on Unix
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_for_write(&self) -> std::io::Result<fs::File> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&self.path)?;
        // mode() only applies on creation; tighten files that already existed
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        Ok(file)
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<StoredCredentials> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoredCredentials::default()),
            Err(e) => {
                return Err(ClientError::Store(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if raw.trim().is_empty() {
            return Ok(StoredCredentials::default());
        }
        serde_json::from_str(&raw).map_err(|e| {
            ClientError::Store(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ClientError::Store(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }
        let body = serde_json::to_vec_pretty(credentials)?;
        let mut file = self.open_for_write().map_err(|e| {
            ClientError::Store(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        file.write_all(&body).map_err(|e| {
            ClientError::Store(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        tracing::debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Store(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
