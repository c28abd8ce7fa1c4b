//! # Fleet Access
//! 
//! Navigation permission overlay: the static menu tree, the locally persisted
//! per-role override map, session persistence, and the resolver deciding which
//! menu items and routes a role may reach.
//!
//! This is a UX layer. The backend remains the authority on what a role may do.

pub mod domain;
pub mod navigation;
pub mod storage;
pub mod services;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{AccessError, StorageError};
pub use services::{PermissionResolver, PermissionStore, SessionStore};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
