//! API request/response models for health alerts.

use super::pagination::Pagination;
use crate::db::models::alerts::{AlertDBResponse, AlertStatus, AlertType};
use crate::types::{AlertId, ChildId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Manual alert entry, raised by a doctor outside the automatic
/// health-record flow
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertCreate {
    #[schema(value_type = String, format = "uuid")]
    pub child_id: ChildId,
    pub alert_type: AlertType,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: AlertId,
    #[schema(value_type = String, format = "uuid")]
    pub child_id: ChildId,
    pub alert_type: AlertType,
    pub message: String,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<AlertDBResponse> for AlertResponse {
    fn from(db: AlertDBResponse) -> Self {
        Self {
            id: db.id,
            child_id: db.child_id,
            alert_type: db.alert_type,
            message: db.message,
            status: db.status,
            created_at: db.created_at,
            resolved_at: db.resolved_at,
        }
    }
}

/// Query parameters for listing alerts
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListAlertsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Restrict the listing to one status
    pub status: Option<AlertStatus>,

    /// Restrict the listing to one child
    #[param(value_type = Option<String>, format = "uuid")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub child_id: Option<ChildId>,
}

/// Count of alerts awaiting action
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingAlertCount {
    pub pending: i64,
}
