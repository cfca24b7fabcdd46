// Session credentials
// The access/refresh pair shared by every outgoing request

pub mod store;

pub use store::{CredentialStore, FileStore, MemoryStore, StoredCredentials};

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::{ClientError, Result};

#[derive(Default)]
struct Credentials {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
}

impl Credentials {
    fn from_stored(stored: StoredCredentials) -> Self {
        Self {
            access: stored.access_token.map(SecretString::from),
            refresh: stored.refresh_token.map(SecretString::from),
        }
    }

    fn to_stored(&self) -> StoredCredentials {
        StoredCredentials {
            access_token: self.access.as_ref().map(|s| s.expose_secret().to_string()),
            refresh_token: self.refresh.as_ref().map(|s| s.expose_secret().to_string()),
        }
    }
}

enum StoreWrite {
    Save(StoredCredentials),
    Clear,
}

/// Owned session state, injected into the HTTP client.
///
/// The pair sits behind one lock, so readers never see an access token from
/// one login next to a refresh token from another. Every change is written
/// through to the backing store on the blocking pool after the lock is
/// released; `store_order` keeps those writes in the order of the changes.
pub struct Session {
    credentials: RwLock<Credentials>,
    store: Arc<dyn CredentialStore>,
    store_order: Mutex<()>,
}

impl Session {
    /// Load whatever the store holds; an unreadable store starts logged out
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let credentials = match store.load() {
            Ok(stored) => Credentials::from_stored(stored),
            Err(e) => {
                tracing::warn!("Failed to load saved session: {} - starting logged out", e);
                Credentials::default()
            }
        };
        Self {
            credentials: RwLock::new(credentials),
            store,
            store_order: Mutex::new(()),
        }
    }

    /// Session that forgets everything when the process exits
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn access_token(&self) -> Option<String> {
        let creds = self.credentials.read().await;
        creds.access.as_ref().map(|s| s.expose_secret().to_string())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        let creds = self.credentials.read().await;
        creds.refresh.as_ref().map(|s| s.expose_secret().to_string())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.credentials.read().await.access.is_some()
    }

    /// Install a fresh pair (login)
    pub async fn set_tokens(&self, access: String, refresh: String) -> Result<()> {
        let mut creds = self.credentials.write().await;
        creds.access = Some(SecretString::from(access));
        creds.refresh = Some(SecretString::from(refresh));
        let snapshot = creds.to_stored();
        let _order = self.store_order.lock().await;
        drop(creds);
        self.write_store(StoreWrite::Save(snapshot)).await
    }

    /// Replace the access token after a refresh, and the refresh token too
    /// when the API rotated it.
    /// A store failure only costs persistence; the new token is still used.
    pub async fn rotate(&self, access: String, refresh: Option<String>) {
        let mut creds = self.credentials.write().await;
        creds.access = Some(SecretString::from(access));
        if let Some(refresh) = refresh {
            creds.refresh = Some(SecretString::from(refresh));
        }
        let snapshot = creds.to_stored();
        let _order = self.store_order.lock().await;
        drop(creds);
        if let Err(e) = self.write_store(StoreWrite::Save(snapshot)).await {
            tracing::warn!("Failed to persist refreshed access token: {}", e);
        }
    }

    /// Drop both tokens (logout or unrecoverable refresh failure)
    pub async fn clear(&self) -> Result<()> {
        let mut creds = self.credentials.write().await;
        *creds = Credentials::default();
        let _order = self.store_order.lock().await;
        drop(creds);
        self.write_store(StoreWrite::Clear).await
    }

    /// Store I/O is synchronous; keep it off the runtime workers
    async fn write_store(&self, write: StoreWrite) -> Result<()> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || match write {
            StoreWrite::Save(credentials) => store.save(&credentials),
            StoreWrite::Clear => store.clear(),
        })
        .await
        .map_err(|e| ClientError::Store(format!("store task failed: {}", e)))?
    }
}
