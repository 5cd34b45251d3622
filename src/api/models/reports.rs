//! API response models for aggregate reports.

use crate::types::ChildId;
use serde::Serialize;
use utoipa::ToSchema;

/// Coverage figures for a single canonical vaccine
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VaccineCoverage {
    pub vaccine_name: String,
    /// Distinct children with at least one matching dose
    pub children_given: i64,
    /// Whole-percent coverage of the cohort, rounded to nearest
    pub percentage: u32,
    /// Children with no matching dose
    pub missing: Vec<MissingChild>,
}

/// A child missing a canonical vaccine
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MissingChild {
    #[schema(value_type = String, format = "uuid")]
    pub child_id: ChildId,
    pub name: String,
}

/// Vaccination coverage across the whole cohort
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VaccinationCoverageReport {
    pub total_children: i64,
    pub coverage: Vec<VaccineCoverage>,
    /// Average distinct canonical vaccines covered per child, one
    /// decimal place
    pub average_vaccines_per_child: f64,
}

/// Nutrition status counts over each child's latest health record
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct NutritionBreakdown {
    pub underweight: i64,
    pub normal: i64,
    pub overweight: i64,
    pub obese: i64,
}

/// Aggregate figures over all health records
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct HealthRecordStatistics {
    pub total_records: i64,
    /// Distinct children with at least one record
    pub children_monitored: i64,
    pub average_weight: Option<f64>,
    pub average_height: Option<f64>,
}

/// Alert counts per status
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AlertStatistics {
    pub pending: i64,
    pub resolved: i64,
}

/// Cohort-wide health summary
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthSummaryReport {
    pub total_children: i64,
    pub total_mothers: i64,
    pub total_immunizations: i64,
    /// Children with no health record at all
    pub children_unmonitored: i64,
    pub records: HealthRecordStatistics,
    pub alerts: AlertStatistics,
    /// Counts over each monitored child's latest health record
    pub nutrition: NutritionBreakdown,
}
