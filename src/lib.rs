//! ferrum-admin: back-office API for the trading storefront
//!
//! Long-running service that:
//! - Manages the order lifecycle (status transitions, inventory deduction,
//!   append-only status history)
//! - Guards every mutation behind JWT auth + role permissions
//! - Manages admin accounts and roles
//! - Sends best-effort order status emails to customers
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── config.rs        # env-driven configuration
//! ├── state.rs         # shared AppState (Postgres pool, SES client)
//! ├── error.rs         # ErrorCode / AppError / ServiceError
//! ├── order_status.rs  # order lifecycle state machine
//! ├── auth/            # JWT, permission catalog, guard middleware
//! ├── db/              # query layer
//! ├── api/             # HTTP routes and handlers
//! └── email/           # customer notifications (SES)
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod order_status;
pub mod state;
