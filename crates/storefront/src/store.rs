//! Local key-value persistence for cart and wishlist snapshots.
//!
//! The backing store mirrors the browser's local storage: string keys mapped
//! to string values, durable for the lifetime of the profile. [`StoreAdapter`]
//! layers JSON-encoded sequences on top of it.
//!
//! # Contract
//!
//! - `load` never fails. A missing key, unparsable JSON, or a payload whose
//!   elements do not match the expected schema all read as an empty sequence.
//! - `save` writes the whole sequence as a single value, so a reader never
//!   observes a partially written snapshot.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from writing to the local store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused the write because it is full.
    #[error("storage quota exceeded while writing {key}")]
    QuotaExceeded { key: String },

    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// The backend is not usable (disabled storage, private mode, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string-keyed, string-valued persistent store.
pub trait LocalStore {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend rejects the write. A failed write
    /// leaves the previous value in place.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the value stored under `key`, if any.
    fn remove_item(&mut self, key: &str);
}

/// In-process [`LocalStore`].
///
/// Clones share the same entries, the way every script on a page shares one
/// `localStorage`. Dropping every handle discards the data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store with no size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes once keys plus values exceed
    /// `quota_bytes`.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().quota_bytes = Some(quota_bytes);
        store
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}

impl MemoryStoreInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl LocalStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(quota) = inner.quota_bytes {
            let needed = inner.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.inner.borrow_mut().entries.remove(key);
    }
}

/// Typed JSON sequences over a [`LocalStore`].
#[derive(Debug, Clone)]
pub struct StoreAdapter<S> {
    backend: S,
}

impl<S: LocalStore> StoreAdapter<S> {
    /// Wrap a backend.
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Load the sequence saved under `key`.
    ///
    /// Returns an empty sequence when the key is absent or the stored value
    /// does not decode as a JSON array of `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.backend.get_item(key) else {
            tracing::debug!(key, "no snapshot stored, starting empty");
            return Vec::new();
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding malformed snapshot");
                Vec::new()
            }
        }
    }

    /// Save `items` under `key` as one JSON array.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if encoding fails or the backend rejects the
    /// write. The previously stored snapshot is left untouched in that case.
    pub fn save<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(items)?;
        self.backend.set_item(key, &encoded)
    }

    /// Delete the snapshot under `key`.
    pub fn clear(&mut self, key: &str) {
        self.backend.remove_item(key);
    }

    /// Borrow the backend.
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Unwrap the backend.
    pub fn into_inner(self) -> S {
        self.backend
    }
}
