//! Database models for maternal health records.

use crate::api::models::mother_health_records::{
    DeliveryType, MotherHealthRecordUpdate, MotherRecordType,
};
use crate::types::{MotherHealthRecordId, UserId};
use chrono::{DateTime, NaiveDate, Utc};

/// Database request for creating a maternal health record
#[derive(Debug, Clone)]
pub struct MotherHealthRecordCreateDBRequest {
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
}

/// Database request for updating a maternal health record. The record
/// type is fixed at creation; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct MotherHealthRecordUpdateDBRequest {
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

impl From<MotherHealthRecordUpdate> for MotherHealthRecordUpdateDBRequest {
    fn from(update: MotherHealthRecordUpdate) -> Self {
        Self {
            weight: update.weight,
            blood_pressure: update.blood_pressure,
            hemoglobin: update.hemoglobin,
            blood_sugar: update.blood_sugar,
            pregnancy_week: update.pregnancy_week,
            delivery_date: update.delivery_date,
            delivery_type: update.delivery_type,
            complications: update.complications,
            medications: update.medications,
            doctor_notes: update.doctor_notes,
            next_checkup_date: update.next_checkup_date,
        }
    }
}

/// Database response for a maternal health record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MotherHealthRecordDBResponse {
    pub id: MotherHealthRecordId,
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
