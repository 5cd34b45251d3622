//! Immunization handlers, including the upcoming and overdue listings.

use crate::api::handlers::load_child_scoped;
use crate::api::models::immunizations::{
    ImmunizationCreate, ImmunizationResponse, ImmunizationUpdate, ListImmunizationsQuery,
    OverdueImmunization, UpcomingImmunization, UpcomingQuery,
};
use crate::api::models::pagination::PaginatedResponse;
use crate::auth::permissions::{can_read_all_resources, operation, resource, RequiresPermission};
use crate::db::handlers::{ImmunizationFilter, Immunizations, Repository};
use crate::db::models::immunizations::{
    ImmunizationCreateDBRequest, ImmunizationUpdateDBRequest, ImmunizationWithChildDBResponse,
};
use crate::domain::schedule::{self, DueStatus};
use crate::errors::{Error, Result};
use crate::types::{ChildId, ImmunizationId, Resource};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

fn validate_vaccine_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Vaccine name cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// List a child's immunizations, most recent dose first
#[utoipa::path(
    get,
    path = "/children/{id}/immunizations",
    tag = "immunizations",
    summary = "List immunizations",
    params(
        ("id" = String, Path, format = "uuid", description = "Child ID"),
        ListImmunizationsQuery,
    ),
    responses(
        (status = 200, description = "Paginated immunizations", body = PaginatedResponse<ImmunizationResponse>),
        (status = 404, description = "Child not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_immunizations(
    State(state): State<AppState>,
    Path(child_id): Path<ChildId>,
    Query(query): Query<ListImmunizationsQuery>,
    user: RequiresPermission<resource::Immunizations, operation::ReadOwn>,
) -> Result<Json<PaginatedResponse<ImmunizationResponse>>> {
    let (skip, limit) = query.pagination.params();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_child_scoped(&mut conn, &user, child_id).await?;

    let filter = ImmunizationFilter::new(child_id, skip, limit);
    let mut repo = Immunizations::new(&mut conn);
    let rows = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    let data = rows.into_iter().map(ImmunizationResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total_count, skip, limit)))
}

/// Record a vaccine dose for a child
#[utoipa::path(
    post,
    path = "/children/{id}/immunizations",
    tag = "immunizations",
    summary = "Record immunization",
    params(("id" = String, Path, format = "uuid", description = "Child ID")),
    request_body = ImmunizationCreate,
    responses(
        (status = 201, description = "Immunization recorded", body = ImmunizationResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Child not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_immunization(
    State(state): State<AppState>,
    Path(child_id): Path<ChildId>,
    user: RequiresPermission<resource::Immunizations, operation::CreateAll>,
    Json(request): Json<ImmunizationCreate>,
) -> Result<(StatusCode, Json<ImmunizationResponse>)> {
    validate_vaccine_name(&request.vaccine_name)?;

    if let Some(due) = request.next_due_date {
        if due < request.date_given {
            return Err(Error::BadRequest {
                message: "Next due date cannot be before the date given".to_string(),
            });
        }
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_child_scoped(&mut conn, &user, child_id).await?;

    let create_request = ImmunizationCreateDBRequest {
        child_id,
        vaccine_name: request.vaccine_name.trim().to_string(),
        date_given: request.date_given,
        next_due_date: request.next_due_date,
        notes: request.notes,
    };

    let row = Immunizations::new(&mut conn).create(&create_request).await?;
    Ok((StatusCode::CREATED, Json(ImmunizationResponse::from(row))))
}

/// Get a single immunization
#[utoipa::path(
    get,
    path = "/immunizations/{id}",
    tag = "immunizations",
    summary = "Get immunization",
    params(("id" = String, Path, format = "uuid", description = "Immunization ID")),
    responses(
        (status = 200, description = "Immunization", body = ImmunizationResponse),
        (status = 404, description = "Immunization not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_immunization(
    State(state): State<AppState>,
    Path(id): Path<ImmunizationId>,
    user: RequiresPermission<resource::Immunizations, operation::ReadOwn>,
) -> Result<Json<ImmunizationResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let row = Immunizations::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Immunization".to_string(),
            id: id.to_string(),
        })?;

    load_child_scoped(&mut conn, &user, row.child_id).await?;

    Ok(Json(ImmunizationResponse::from(row)))
}

/// Correct an immunization record
#[utoipa::path(
    patch,
    path = "/immunizations/{id}",
    tag = "immunizations",
    summary = "Update immunization",
    params(("id" = String, Path, format = "uuid", description = "Immunization ID")),
    request_body = ImmunizationUpdate,
    responses(
        (status = 200, description = "Updated immunization", body = ImmunizationResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Immunization not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_immunization(
    State(state): State<AppState>,
    Path(id): Path<ImmunizationId>,
    user: RequiresPermission<resource::Immunizations, operation::UpdateAll>,
    Json(update): Json<ImmunizationUpdate>,
) -> Result<Json<ImmunizationResponse>> {
    if let Some(name) = &update.vaccine_name {
        validate_vaccine_name(name)?;
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let existing = Immunizations::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Immunization".to_string(),
            id: id.to_string(),
        })?;

    load_child_scoped(&mut conn, &user, existing.child_id).await?;

    let db_update = ImmunizationUpdateDBRequest::from(update);
    let row = Immunizations::new(&mut conn).update(id, &db_update).await?;
    Ok(Json(ImmunizationResponse::from(row)))
}

/// Delete an immunization record
#[utoipa::path(
    delete,
    path = "/immunizations/{id}",
    tag = "immunizations",
    summary = "Delete immunization",
    params(("id" = String, Path, format = "uuid", description = "Immunization ID")),
    responses(
        (status = 204, description = "Immunization deleted"),
        (status = 404, description = "Immunization not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_immunization(
    State(state): State<AppState>,
    Path(id): Path<ImmunizationId>,
    user: RequiresPermission<resource::Immunizations, operation::DeleteAll>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let existing = Immunizations::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Immunization".to_string(),
            id: id.to_string(),
        })?;

    load_child_scoped(&mut conn, &user, existing.child_id).await?;

    Immunizations::new(&mut conn).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn into_response(row: ImmunizationWithChildDBResponse) -> (ImmunizationResponse, String) {
    let child_name = row.child_name.clone();
    let response = ImmunizationResponse {
        id: row.id,
        child_id: row.child_id,
        vaccine_name: row.vaccine_name,
        date_given: row.date_given,
        next_due_date: row.next_due_date,
        notes: row.notes,
        created_at: row.created_at,
    };
    (response, child_name)
}

/// Immunizations with a next dose due within the lookahead window.
///
/// Doctors see the whole cohort; mothers see only their own children.
#[utoipa::path(
    get,
    path = "/immunizations/upcoming",
    tag = "immunizations",
    summary = "Upcoming immunizations",
    params(UpcomingQuery),
    responses(
        (status = 200, description = "Upcoming immunizations, soonest first", body = Vec<UpcomingImmunization>),
        (status = 400, description = "Invalid window"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn upcoming_immunizations(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
    user: RequiresPermission<resource::Immunizations, operation::ReadOwn>,
) -> Result<Json<Vec<UpcomingImmunization>>> {
    let window = query
        .days
        .unwrap_or(state.config.immunizations.upcoming_window_days);
    if window < 1 {
        return Err(Error::BadRequest {
            message: "Lookahead window must be at least 1 day".to_string(),
        });
    }

    let mother_scope = if can_read_all_resources(&user, Resource::Immunizations) {
        None
    } else {
        Some(user.id)
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let rows = Immunizations::new(&mut conn)
        .list_with_due_dates(mother_scope)
        .await?;

    let today = Utc::now().date_naive();
    let upcoming = rows
        .into_iter()
        .filter_map(|row| {
            match schedule::due_status(row.next_due_date, today, window) {
                DueStatus::Upcoming { days_until_due } => {
                    let (immunization, child_name) = into_response(row);
                    Some(UpcomingImmunization {
                        immunization,
                        child_name,
                        days_until_due,
                    })
                }
                _ => None,
            }
        })
        .collect();

    Ok(Json(upcoming))
}

/// Immunizations whose next dose date has already passed
#[utoipa::path(
    get,
    path = "/immunizations/overdue",
    tag = "immunizations",
    summary = "Overdue immunizations",
    responses(
        (status = 200, description = "Overdue immunizations, most overdue first", body = Vec<OverdueImmunization>),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn overdue_immunizations(
    State(state): State<AppState>,
    user: RequiresPermission<resource::Immunizations, operation::ReadOwn>,
) -> Result<Json<Vec<OverdueImmunization>>> {
    let mother_scope = if can_read_all_resources(&user, Resource::Immunizations) {
        None
    } else {
        Some(user.id)
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let rows = Immunizations::new(&mut conn)
        .list_with_due_dates(mother_scope)
        .await?;

    let today = Utc::now().date_naive();
    let mut overdue: Vec<OverdueImmunization> = rows
        .into_iter()
        .filter_map(|row| {
            match schedule::due_status(row.next_due_date, today, 0) {
                DueStatus::Overdue { days_overdue } => {
                    let (immunization, child_name) = into_response(row);
                    Some(OverdueImmunization {
                        immunization,
                        child_name,
                        days_overdue,
                    })
                }
                _ => None,
            }
        })
        .collect();

    overdue.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
    Ok(Json(overdue))
}
