//! Access layer errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid menu item: {0}")]
    InvalidMenu(String),

    #[error("Duplicate menu title under {parent}: {title}")]
    DuplicateTitle { parent: String, title: String },

    #[error("Duplicate menu url: {0}")]
    DuplicateUrl(String),

    #[error("Invalid session: {0}")]
    InvalidSession(String),
}
