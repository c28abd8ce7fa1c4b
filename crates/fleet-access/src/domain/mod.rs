//! # Fleet Access - Domain Module
//! 
//! Menu tree, permission overrides and session entities.

pub mod menu;
pub mod overrides;
pub mod session;

pub use menu::{permission_key, MenuEntry, MenuItem, MenuTree};
pub use overrides::PermissionOverrides;
pub use session::{Session, SessionUser};
