//! API request and response data models.
//!
//! These structures define the public API contract. They are distinct
//! from the database models so the wire format and the storage format
//! can evolve independently; every model carries `utoipa` annotations
//! for the generated OpenAPI document.

pub mod alerts;
pub mod auth;
pub mod children;
pub mod health_records;
pub mod immunizations;
pub mod mother_health_records;
pub mod pagination;
pub mod reports;
pub mod users;
