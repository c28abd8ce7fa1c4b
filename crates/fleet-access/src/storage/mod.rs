//! Key/value persistence (port) standing in for browser local storage

pub mod memory;
pub mod file;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

/// String-keyed, string-valued store. Values are opaque to the storage;
/// callers own their serialization.
#[cfg_attr(test, mockall::automock)]
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
