//! Database models for immunizations.

use crate::api::models::immunizations::ImmunizationUpdate;
use crate::types::{ChildId, ImmunizationId};
use chrono::{DateTime, NaiveDate, Utc};

/// Database request for recording an immunization
#[derive(Debug, Clone)]
pub struct ImmunizationCreateDBRequest {
    pub child_id: ChildId,
    pub vaccine_name: String,
    pub date_given: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Database request for updating an immunization.
///
/// `next_due_date` uses a double Option: the outer layer distinguishes
/// "leave unchanged" from "set", and the inner one allows clearing the
/// due date when a series completes.
#[derive(Debug, Clone, Default)]
pub struct ImmunizationUpdateDBRequest {
    pub vaccine_name: Option<String>,
    pub date_given: Option<NaiveDate>,
    pub next_due_date: Option<Option<NaiveDate>>,
    pub notes: Option<String>,
}

impl From<ImmunizationUpdate> for ImmunizationUpdateDBRequest {
    fn from(update: ImmunizationUpdate) -> Self {
        Self {
            vaccine_name: update.vaccine_name,
            date_given: update.date_given,
            next_due_date: update.next_due_date,
            notes: update.notes,
        }
    }
}

/// Database response for an immunization
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImmunizationDBResponse {
    pub id: ImmunizationId,
    pub child_id: ChildId,
    pub vaccine_name: String,
    pub date_given: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An immunization joined with its child's name, used by the upcoming
/// and overdue listings which span the whole cohort.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImmunizationWithChildDBResponse {
    pub id: ImmunizationId,
    pub child_id: ChildId,
    pub vaccine_name: String,
    pub date_given: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub child_name: String,
}
