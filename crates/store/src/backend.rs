use crate::{Result, StoreError};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Raw string storage, the shape of a browser's `localStorage`.
///
/// Implementations use interior mutability so one backend can be shared by every
/// component of a page through an `Rc`.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Session-only storage, optionally bounded by a byte quota.
#[derive(Debug)]
pub struct MemoryBackend {
    items: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
    available: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            items: RefCell::new(BTreeMap::new()),
            quota_bytes: None,
            available: Cell::new(true),
            writes: Cell::new(0),
        }
    }

    /// Reject writes once keys plus values would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota_bytes: Some(bytes),
            ..Self::new()
        }
    }

    /// Simulates storage being switched off (private mode, blocked cookies).
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    /// Number of successful `set_item` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    /// Store `value` verbatim, bypassing availability and quota checks.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory storage disabled".into()))
        }
    }

    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        let items = self.items.borrow();
        let others: usize = items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.ensure_available()?;
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_available()?;
        if let Some(limit) = self.quota_bytes {
            let needed = self.used_bytes_with(key, value);
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.ensure_available()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// A backend that is never available. Every feature degrades to session-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledBackend;

impl StorageBackend for DisabledBackend {
    fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn remove_item(&self, _key: &str) -> Result<()> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
}
