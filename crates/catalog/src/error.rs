use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Empty {0} id")]
    EmptyId(&'static str),

    #[error("Duplicate group id: {0}")]
    DuplicateGroup(String),

    #[error("Duplicate entry id: {0}")]
    DuplicateEntry(String),

    #[error("Entry {entry} references unknown group {group}")]
    UnknownGroup { entry: String, group: String },
}
