//! Database models for children.

use crate::api::models::children::{ChildUpdate, Gender};
use crate::types::{ChildId, UserId};
use chrono::{DateTime, NaiveDate, Utc};

/// Database request for registering a child
#[derive(Debug, Clone)]
pub struct ChildCreateDBRequest {
    pub mother_id: UserId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

/// Database request for updating a child
#[derive(Debug, Clone, Default)]
pub struct ChildUpdateDBRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

impl From<ChildUpdate> for ChildUpdateDBRequest {
    fn from(update: ChildUpdate) -> Self {
        Self {
            name: update.name,
            date_of_birth: update.date_of_birth,
            gender: update.gender,
        }
    }
}

/// Database response for a child
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChildDBResponse {
    pub id: ChildId,
    pub mother_id: UserId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
