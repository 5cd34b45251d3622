//! Common type definitions and permission system types.
//!
//! This module defines:
//! - Type aliases for entity IDs (UserId, ChildId, etc.)
//! - Permission and authorization types
//! - Resource and operation enums for access control
//!
//! All entity IDs are UUIDs wrapped in type aliases for better type safety.
//!
//! Operations come in two flavors:
//! - **All**: unrestricted access to all entities (doctor-level, e.g. `ReadAll`)
//! - **Own**: restricted to the caller's own entities (mother-level, e.g. `ReadOwn`)

use std::fmt;
use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type ChildId = Uuid;
pub type HealthRecordId = Uuid;
pub type MotherHealthRecordId = Uuid;
pub type ImmunizationId = Uuid;
pub type AlertId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

// Operations that can be performed on resources
// *-All means unrestricted access, *-Own means restricted to own resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateAll,
    CreateOwn,
    ReadAll,
    ReadOwn,
    UpdateAll,
    UpdateOwn,
    DeleteAll,
    DeleteOwn,
}

// Resources that can be operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Children,
    HealthRecords,
    MotherHealthRecords,
    Immunizations,
    Alerts,
    Reports,
}

// Permission types for authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    /// Simple permission: (Resource, Operation)
    Allow(Resource, Operation),
    /// Logical combinator: any of the listed permissions suffices
    Any(Vec<Permission>),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateAll | Operation::CreateOwn => write!(f, "Create"),
            Operation::ReadAll | Operation::ReadOwn => write!(f, "Read"),
            Operation::UpdateAll | Operation::UpdateOwn => write!(f, "Update"),
            Operation::DeleteAll | Operation::DeleteOwn => write!(f, "Delete"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Users => write!(f, "users"),
            Resource::Children => write!(f, "children"),
            Resource::HealthRecords => write!(f, "health records"),
            Resource::MotherHealthRecords => write!(f, "mother health records"),
            Resource::Immunizations => write!(f, "immunizations"),
            Resource::Alerts => write!(f, "alerts"),
            Resource::Reports => write!(f, "reports"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id: Uuid = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }

    #[test]
    fn test_operation_display_collapses_scope() {
        assert_eq!(Operation::ReadAll.to_string(), "Read");
        assert_eq!(Operation::ReadOwn.to_string(), "Read");
        assert_eq!(Operation::DeleteOwn.to_string(), "Delete");
    }
}
