//! # Portfolio Store
//!
//! String-keyed JSON persistence that never gets in the user's way.
//!
//! ```text
//! KvStore::get / set / remove        best effort, errors logged and swallowed
//!     │
//!     └──> KvStore::try_get / try_set / try_remove     Result<T, StoreError>
//!             │
//!             └──> StorageBackend (memory | file directory | disabled)
//! ```
//!
//! ## Example
//!
//! ```
//! use portfolio_store::KvStore;
//! use std::collections::BTreeMap;
//!
//! let store = KvStore::in_memory();
//! let mut done = BTreeMap::new();
//! done.insert("u1-s1".to_string(), true);
//! store.set("completion", &done);
//!
//! let loaded: BTreeMap<String, bool> = store.get("completion", BTreeMap::new());
//! assert_eq!(loaded, done);
//! ```

mod backend;
mod error;
mod file;
mod store;

pub use backend::{DisabledBackend, MemoryBackend, StorageBackend};
pub use error::{Result, StoreError};
pub use file::FileBackend;
pub use store::KvStore;
