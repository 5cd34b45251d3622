//! HTTP request handlers.
//!
//! Handlers authenticate via extractors, open a transaction when a
//! request touches more than one table, and translate between API
//! models and database models. Ownership checks for Own-scoped callers
//! happen here, before any data leaves the database layer.

pub mod alerts;
pub mod auth;
pub mod children;
pub mod health_records;
pub mod immunizations;
pub mod mother_health_records;
pub mod reports;
pub mod users;

use crate::api::models::users::CurrentUser;
use crate::auth::permissions::can_read_all_resources;
use crate::db::handlers::{Children, Repository};
use crate::db::models::children::ChildDBResponse;
use crate::errors::{Error, Result};
use crate::types::{ChildId, Resource};
use sqlx::PgConnection;

/// Load a child and enforce ownership for Own-scoped callers. Doctors
/// see any child; a mother only her own. A child that exists but
/// belongs to another mother reads as not found, so the API does not
/// leak which IDs exist.
pub(crate) async fn load_child_scoped(
    conn: &mut PgConnection,
    user: &CurrentUser,
    child_id: ChildId,
) -> Result<ChildDBResponse> {
    let child = Children::new(conn)
        .get_by_id(child_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Child".to_string(),
            id: child_id.to_string(),
        })?;

    if !can_read_all_resources(user, Resource::Children) && child.mother_id != user.id {
        return Err(Error::NotFound {
            resource: "Child".to_string(),
            id: child_id.to_string(),
        });
    }

    Ok(child)
}
