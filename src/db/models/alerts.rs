//! Database models for health alerts.

use crate::types::{AlertId, ChildId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "alert_type", rename_all = "lowercase")]
pub enum AlertType {
    Underweight,
    Overweight,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "alert_status", rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Resolved,
}

/// Database request for raising an alert, either automatically in
/// reaction to a health record or manually by a doctor.
#[derive(Debug, Clone)]
pub struct AlertCreateDBRequest {
    pub child_id: ChildId,
    pub alert_type: AlertType,
    pub message: String,
}

/// Database response for an alert
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertDBResponse {
    pub id: AlertId,
    pub child_id: ChildId,
    pub alert_type: AlertType,
    pub message: String,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
