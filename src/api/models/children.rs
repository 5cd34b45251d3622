//! API request/response models for children.

use super::health_records::HealthRecordResponse;
use super::pagination::Pagination;
use crate::db::models::children::ChildDBResponse;
use crate::domain::age;
use crate::types::{ChildId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChildCreate {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    /// Mother this child belongs to. Doctors must supply it; for
    /// mothers it is inferred from the session and ignored if present.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub mother_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChildUpdate {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChildResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ChildId,
    #[schema(value_type = String, format = "uuid")]
    pub mother_id: UserId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    /// Whole months since date of birth, computed at read time
    pub age_months: i32,
    /// Human-readable age such as "2 years 5 months"
    pub age: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChildDBResponse> for ChildResponse {
    fn from(db: ChildDBResponse) -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: db.id,
            mother_id: db.mother_id,
            name: db.name,
            date_of_birth: db.date_of_birth,
            gender: db.gender,
            age_months: age::age_in_months(db.date_of_birth, today),
            age: age::age_string(db.date_of_birth, today),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// A child together with their most recent health record, for the
/// detail view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChildDetailResponse {
    #[serde(flatten)]
    pub child: ChildResponse,
    /// The latest health record, if any have been taken
    pub latest_record: Option<HealthRecordResponse>,
}

/// Query parameters for listing children
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListChildrenQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,

    /// Restrict the listing to one mother's children
    #[param(value_type = Option<String>, format = "uuid")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub mother_id: Option<UserId>,
}
