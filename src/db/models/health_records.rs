//! Database models for child health records.

use crate::domain::growth::NutritionStatus;
use crate::types::{ChildId, HealthRecordId};
use chrono::{DateTime, NaiveDate, Utc};

/// Database request for recording a measurement. BMI and nutrition
/// status are computed by the caller before the row is written, so the
/// stored values never drift from what was alerted on.
#[derive(Debug, Clone)]
pub struct HealthRecordCreateDBRequest {
    pub child_id: ChildId,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    pub nutrition_status: NutritionStatus,
    pub doctor_notes: Option<String>,
    pub record_date: NaiveDate,
}

/// Database request for correcting a measurement. The caller merges
/// the incoming fields with the stored row and recomputes BMI and
/// nutrition status, so both are always present here.
#[derive(Debug, Clone)]
pub struct HealthRecordUpdateDBRequest {
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    pub nutrition_status: NutritionStatus,
    pub doctor_notes: Option<String>,
    pub record_date: NaiveDate,
}

/// Database response for a health record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HealthRecordDBResponse {
    pub id: HealthRecordId,
    pub child_id: ChildId,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    pub nutrition_status: NutritionStatus,
    pub doctor_notes: Option<String>,
    pub record_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
