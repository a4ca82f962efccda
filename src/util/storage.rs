//! Durable key-value backends for session persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser build talks to `window.localStorage`; native and SSR builds use
//! an in-memory map. Both sit behind `KeyValueStore` so the session repository
//! never touches `web-sys` directly.
//!
//! TRADE-OFFS
//! ==========
//! `BrowserStorage` re-resolves `localStorage` on every call instead of holding
//! a `web_sys::Storage`. That keeps it `Send + Sync` (reactive closures require
//! it) at the cost of a cheap lookup per access.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("durable storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },
    #[error("storage access failed: {0}")]
    Access(String),
    #[error("failed to serialize {key}: {message}")]
    Serialize { key: String, message: String },
}

/// String-keyed, string-valued store scoped to one origin.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-memory store. Clones share contents, like two tabs of one origin.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    capacity_bytes: Option<usize>,
}

impl MemoryInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl MemoryStore {
    /// Store that rejects writes once keys + values exceed `capacity` bytes.
    pub fn with_capacity_bytes(capacity: usize) -> Self {
        let store = Self::default();
        store.lock_inner().capacity_bytes = Some(capacity);
        store
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock_inner().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned map is still a valid map; keep serving it.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock_inner().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock_inner();
        if let Some(capacity) = inner.capacity_bytes {
            if inner.used_bytes_without(key) + key.len() + value.len() > capacity {
                return Err(StorageError::QuotaExceeded { key: key.to_owned() });
            }
        }
        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock_inner().entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// BROWSER STORAGE
// =============================================================================

/// `window.localStorage`. Outside the browser every call reports `Unavailable`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or(StorageError::Unavailable)?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StorageError::Unavailable),
        Err(e) => Err(StorageError::Access(format!("{e:?}"))),
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| StorageError::Access(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            // Browsers only throw from setItem on quota or privacy-mode denial.
            local_storage()?
                .set_item(key, value)
                .map_err(|_| StorageError::QuotaExceeded { key: key.to_owned() })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Access(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

/// Backend for the current build: `localStorage` in the browser, an empty
/// in-memory store everywhere else.
pub fn default_backend() -> Arc<dyn KeyValueStore> {
    #[cfg(feature = "hydrate")]
    {
        Arc::new(BrowserStorage)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Arc::new(MemoryStore::default())
    }
}
