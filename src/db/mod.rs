//! Database access layer (PostgreSQL via sqlx)

pub mod admins;
pub mod inventory;
pub mod orders;
pub mod roles;
