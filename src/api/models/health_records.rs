//! API request/response models for child health records.

use super::pagination::Pagination;
use crate::db::models::health_records::HealthRecordDBResponse;
use crate::domain::growth::NutritionStatus;
use crate::types::{ChildId, HealthRecordId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRecordCreate {
    /// Weight in kilograms, must be positive
    pub weight: f64,
    /// Height in metres, must be positive
    pub height: f64,
    /// Date the measurement was taken; defaults to today
    pub record_date: Option<NaiveDate>,
    pub doctor_notes: Option<String>,
}

/// Measurement correction. When weight or height change, BMI and
/// nutrition status are recomputed; corrections never raise new alerts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRecordUpdate {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub record_date: Option<NaiveDate>,
    pub doctor_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRecordResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: HealthRecordId,
    #[schema(value_type = String, format = "uuid")]
    pub child_id: ChildId,
    pub weight: f64,
    pub height: f64,
    /// BMI computed from weight and height at creation time
    pub bmi: f64,
    pub nutrition_status: NutritionStatus,
    pub doctor_notes: Option<String>,
    pub record_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<HealthRecordDBResponse> for HealthRecordResponse {
    fn from(db: HealthRecordDBResponse) -> Self {
        Self {
            id: db.id,
            child_id: db.child_id,
            weight: db.weight,
            height: db.height,
            bmi: db.bmi,
            nutrition_status: db.nutrition_status,
            doctor_notes: db.doctor_notes,
            record_date: db.record_date,
            created_at: db.created_at,
        }
    }
}

/// Query parameters for listing a child's health records
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListHealthRecordsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,
}

/// One point on a child's growth trend, ordered oldest first
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GrowthTrendPoint {
    pub record_date: NaiveDate,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    pub nutrition_status: NutritionStatus,
}

impl From<HealthRecordDBResponse> for GrowthTrendPoint {
    fn from(db: HealthRecordDBResponse) -> Self {
        Self {
            record_date: db.record_date,
            weight: db.weight,
            height: db.height,
            bmi: db.bmi,
            nutrition_status: db.nutrition_status,
        }
    }
}

/// Growth trend for one child
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GrowthTrendResponse {
    #[schema(value_type = String, format = "uuid")]
    pub child_id: ChildId,
    pub points: Vec<GrowthTrendPoint>,
}
