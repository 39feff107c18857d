use crate::{MemoryBackend, Result, StorageBackend};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// JSON view over a [`StorageBackend`].
///
/// Cloning is cheap and every clone shares the same backend. The `try_*` methods
/// report failures; `get`/`set`/`remove` swallow them so that storage trouble
/// only ever costs persistence, never functionality.
#[derive(Clone)]
pub struct KvStore {
    backend: Rc<dyn StorageBackend>,
}

impl KvStore {
    pub fn new<B: StorageBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    pub fn from_shared(backend: Rc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Decoded value at `key`; `Ok(None)` when the key is missing or empty.
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get_item(key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    pub fn try_get_raw(&self, key: &str) -> Result<Option<String>> {
        self.backend.get_item(key)
    }

    pub fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set_item(key, &raw)
    }

    pub fn try_remove(&self, key: &str) -> Result<()> {
        self.backend.remove_item(key)
    }

    /// Decoded value at `key`, or `fallback` when it is missing, malformed or
    /// the backend is unavailable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(err) => {
                log::debug!("store: read of {key} failed, using fallback: {err}");
                fallback
            }
        }
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key, T::default())
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.try_get_raw(key)
            .map_err(|err| log::debug!("store: raw read of {key} failed: {err}"))
            .ok()
            .flatten()
    }

    /// Best-effort write.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_set(key, value) {
            log::debug!("store: write of {key} dropped: {err}");
        }
    }

    /// Best-effort delete.
    pub fn remove(&self, key: &str) {
        if let Err(err) = self.try_remove(key) {
            log::debug!("store: remove of {key} dropped: {err}");
        }
    }
}

impl fmt::Debug for KvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvStore").finish_non_exhaustive()
    }
}

impl Default for KvStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
