//! Pure health-domain rules: growth classification, immunization
//! scheduling, vaccination coverage, and age derivation. Nothing in
//! here touches the database or the HTTP layer, which keeps the rules
//! trivially unit-testable.

pub mod age;
pub mod coverage;
pub mod growth;
pub mod schedule;
