//! Admin authentication and authorization

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use middleware::{AdminIdentity, require_auth, require_permission};
pub use permissions::Permission;
