//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut PgConnection`, implements the
//! [`Repository`] trait for its table and adds entity-specific reads.
//! Handlers that need multiple statements to be atomic open a
//! transaction and build repositories on top of it.

pub mod alerts;
pub mod children;
pub mod health_records;
pub mod immunizations;
pub mod mother_health_records;
pub mod repository;
pub mod users;

pub use alerts::{AlertFilter, Alerts};
pub use children::{ChildFilter, Children};
pub use health_records::{HealthRecordFilter, HealthRecords};
pub use immunizations::{ImmunizationFilter, Immunizations};
pub use mother_health_records::{MotherHealthRecordFilter, MotherHealthRecords};
pub use repository::Repository;
pub use users::{UserFilter, Users};
