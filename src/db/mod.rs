//! Database layer for data persistence and access.
//!
//! SQLx over PostgreSQL, organized into three pieces:
//!
//! - [`handlers`]: repository implementations for CRUD and reporting
//!   queries
//! - [`models`]: row structures matching the table schemas
//! - [`errors`]: database-specific error categorization

pub mod errors;
pub mod handlers;
pub mod models;
