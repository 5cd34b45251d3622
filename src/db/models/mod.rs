//! Database record models matching table schemas.
//!
//! Each submodule pairs `*CreateDBRequest`/`*UpdateDBRequest` inputs
//! with a `*DBResponse` row type deriving `sqlx::FromRow`. Database
//! models are distinct from API models so the storage representation
//! can evolve without breaking the API contract.

pub mod alerts;
pub mod children;
pub mod health_records;
pub mod immunizations;
pub mod mother_health_records;
pub mod users;
