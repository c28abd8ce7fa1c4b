//! Access services (business logic)

pub mod permission_resolver;
pub mod permission_store;
pub mod session_store;

pub use permission_resolver::PermissionResolver;
pub use permission_store::PermissionStore;
pub use session_store::SessionStore;
