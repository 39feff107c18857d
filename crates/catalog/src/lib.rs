//! # Portfolio Catalog
//!
//! The read-only lists the rest of the core filters: groups in display order and
//! the entries inside them. Catalogs are static configuration, so construction
//! validates eagerly and refuses a malformed catalog instead of rendering a
//! half-broken view.

mod builtin;
mod catalog;
mod error;

pub use builtin::BuiltinCatalog;
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
