//! API request/response models for maternal health records.

use super::pagination::Pagination;
use crate::db::models::mother_health_records::MotherHealthRecordDBResponse;
use crate::types::{MotherHealthRecordId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "mother_record_type", rename_all = "lowercase")]
pub enum MotherRecordType {
    General,
    Prenatal,
    Postnatal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "delivery_type", rename_all = "lowercase")]
pub enum DeliveryType {
    Normal,
    Cesarean,
    Assisted,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MotherHealthRecordCreate {
    pub record_type: MotherRecordType,
    /// Weight in kilograms
    pub weight: Option<f64>,
    /// Blood pressure as "systolic/diastolic", e.g. "120/80"
    pub blood_pressure: Option<String>,
    /// Hemoglobin in g/dL
    pub hemoglobin: Option<f64>,
    /// Blood sugar in mg/dL
    pub blood_sugar: Option<f64>,
    /// Weeks of gestation for prenatal records
    pub pregnancy_week: Option<i32>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_type: Option<DeliveryType>,
    pub complications: Option<String>,
    pub medications: Option<String>,
    pub doctor_notes: Option<String>,
    pub next_checkup_date: Option<NaiveDate>,
    /// Date the record refers to; defaults to today
    pub record_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MotherHealthRecordUpdate {
    pub weight: Option<f64>,
    pub blood_pressure: Option<String>,
    pub hemoglobin: Option<f64>,
    pub blood_sugar: Option<f64>,
    pub pregnancy_week: Option<i32>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_type: Option<DeliveryType>,
    pub complications: Option<String>,
    pub medications: Option<String>,
    pub doctor_notes: Option<String>,
    pub next_checkup_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MotherHealthRecordResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: MotherHealthRecordId,
    #[schema(value_type = String, format = "uuid")]
    pub mother_id: UserId,
    pub record_type: MotherRecordType,
    pub weight: Option<f64>,
    pub blood_pressure: Option<String>,
    pub hemoglobin: Option<f64>,
    pub blood_sugar: Option<f64>,
    pub pregnancy_week: Option<i32>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_type: Option<DeliveryType>,
    pub complications: Option<String>,
    pub medications: Option<String>,
    pub doctor_notes: Option<String>,
    pub next_checkup_date: Option<NaiveDate>,
    pub record_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<MotherHealthRecordDBResponse> for MotherHealthRecordResponse {
    fn from(db: MotherHealthRecordDBResponse) -> Self {
        Self {
            id: db.id,
            mother_id: db.mother_id,
            record_type: db.record_type,
            weight: db.weight,
            blood_pressure: db.blood_pressure,
            hemoglobin: db.hemoglobin,
            blood_sugar: db.blood_sugar,
            pregnancy_week: db.pregnancy_week,
            delivery_date: db.delivery_date,
            delivery_type: db.delivery_type,
            complications: db.complications,
            medications: db.medications,
            doctor_notes: db.doctor_notes,
            next_checkup_date: db.next_checkup_date,
            record_date: db.record_date,
            created_at: db.created_at,
        }
    }
}

/// One point in a mother's vitals trend
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MotherVitalsPoint {
    pub record_date: NaiveDate,
    pub weight: Option<f64>,
    pub blood_pressure: Option<String>,
    pub hemoglobin: Option<f64>,
    pub blood_sugar: Option<f64>,
}

impl From<MotherHealthRecordDBResponse> for MotherVitalsPoint {
    fn from(db: MotherHealthRecordDBResponse) -> Self {
        Self {
            record_date: db.record_date,
            weight: db.weight,
            blood_pressure: db.blood_pressure,
            hemoglobin: db.hemoglobin,
            blood_sugar: db.blood_sugar,
        }
    }
}

/// A mother's vitals over time, oldest first, for charting
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MotherHealthTrendResponse {
    #[schema(value_type = String, format = "uuid")]
    pub mother_id: UserId,
    pub points: Vec<MotherVitalsPoint>,
}

/// Query parameters for listing a mother's health records
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListMotherHealthRecordsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Restrict the listing to one record type
    pub record_type: Option<MotherRecordType>,
}
