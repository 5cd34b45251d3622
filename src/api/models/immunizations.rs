//! API request/response models for immunizations.

use super::pagination::Pagination;
use crate::db::models::immunizations::ImmunizationDBResponse;
use crate::types::{ChildId, ImmunizationId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImmunizationCreate {
    pub vaccine_name: String,
    pub date_given: NaiveDate,
    /// When the next dose is due; absent for completed series
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImmunizationUpdate {
    pub vaccine_name: Option<String>,
    pub date_given: Option<NaiveDate>,
    /// None = no change, Some(None) = clear (series complete),
    /// Some(date) = set
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[schema(value_type = Option<Option<String>>)]
    pub next_due_date: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImmunizationResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ImmunizationId,
    #[schema(value_type = String, format = "uuid")]
    pub child_id: ChildId,
    pub vaccine_name: String,
    pub date_given: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ImmunizationDBResponse> for ImmunizationResponse {
    fn from(db: ImmunizationDBResponse) -> Self {
        Self {
            id: db.id,
            child_id: db.child_id,
            vaccine_name: db.vaccine_name,
            date_given: db.date_given,
            next_due_date: db.next_due_date,
            notes: db.notes,
            created_at: db.created_at,
        }
    }
}

/// An immunization whose next dose falls within the lookahead window
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpcomingImmunization {
    #[serde(flatten)]
    pub immunization: ImmunizationResponse,
    pub child_name: String,
    /// Days from today until the due date; 0 means due today
    pub days_until_due: i64,
}

/// An immunization whose next dose date has passed
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverdueImmunization {
    #[serde(flatten)]
    pub immunization: ImmunizationResponse,
    pub child_name: String,
    /// Days since the due date passed, at least 1
    pub days_overdue: i64,
}

/// Query parameters for listing a child's immunizations
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListImmunizationsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,
}

/// Query parameters for the upcoming immunizations listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UpcomingQuery {
    /// Lookahead window in days; defaults to the configured window
    #[param(minimum = 1)]
    pub days: Option<i64>,
}
