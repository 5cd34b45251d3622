//! Child health record handlers, including the automatic alert side
//! effect on creation.

use crate::api::handlers::load_child_scoped;
use crate::api::models::health_records::{
    GrowthTrendPoint, GrowthTrendResponse, HealthRecordCreate, HealthRecordResponse,
    HealthRecordUpdate, ListHealthRecordsQuery,
};
use crate::api::models::pagination::PaginatedResponse;
use crate::auth::permissions::{operation, resource, RequiresPermission};
use crate::db::handlers::{Alerts, HealthRecordFilter, HealthRecords, Repository};
use crate::db::models::alerts::AlertCreateDBRequest;
use crate::db::models::health_records::{HealthRecordCreateDBRequest, HealthRecordUpdateDBRequest};
use crate::domain::growth;
use crate::errors::{Error, Result};
use crate::types::{ChildId, HealthRecordId};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

fn validate_measurements(weight: f64, height: f64) -> Result<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(Error::BadRequest {
            message: "Weight must be a positive number".to_string(),
        });
    }
    if !height.is_finite() || height <= 0.0 {
        return Err(Error::BadRequest {
            message: "Height must be a positive number".to_string(),
        });
    }
    Ok(())
}

/// List a child's health records, newest first
#[utoipa::path(
    get,
    path = "/children/{id}/health-records",
    tag = "health-records",
    summary = "List health records",
    params(
        ("id" = String, Path, format = "uuid", description = "Child ID"),
        ListHealthRecordsQuery,
    ),
    responses(
        (status = 200, description = "Paginated health records", body = PaginatedResponse<HealthRecordResponse>),
        (status = 404, description = "Child not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_health_records(
    State(state): State<AppState>,
    Path(child_id): Path<ChildId>,
    Query(query): Query<ListHealthRecordsQuery>,
    user: RequiresPermission<resource::HealthRecords, operation::ReadOwn>,
) -> Result<Json<PaginatedResponse<HealthRecordResponse>>> {
    let (skip, limit) = query.pagination.params();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_child_scoped(&mut conn, &user, child_id).await?;

    let filter = HealthRecordFilter::new(child_id, skip, limit);
    let mut repo = HealthRecords::new(&mut conn);
    let records = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    let data = records.into_iter().map(HealthRecordResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total_count, skip, limit)))
}

/// Record a measurement for a child.
///
/// BMI and nutrition status are computed server-side; an underweight or
/// overweight classification raises a pending alert in the same
/// transaction as the record itself.
#[utoipa::path(
    post,
    path = "/children/{id}/health-records",
    tag = "health-records",
    summary = "Record measurement",
    params(("id" = String, Path, format = "uuid", description = "Child ID")),
    request_body = HealthRecordCreate,
    responses(
        (status = 201, description = "Health record created", body = HealthRecordResponse),
        (status = 400, description = "Invalid measurements"),
        (status = 404, description = "Child not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_health_record(
    State(state): State<AppState>,
    Path(child_id): Path<ChildId>,
    user: RequiresPermission<resource::HealthRecords, operation::CreateAll>,
    Json(request): Json<HealthRecordCreate>,
) -> Result<(StatusCode, Json<HealthRecordResponse>)> {
    validate_measurements(request.weight, request.height)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let child = load_child_scoped(&mut tx, &user, child_id).await?;

    let today = Utc::now().date_naive();
    let record_date = request.record_date.unwrap_or(today);
    let bmi = growth::bmi(request.weight, request.height);

    let age_months = crate::domain::age::age_in_months(child.date_of_birth, today);
    let status = growth::classify(bmi, Some(age_months), Some(child.gender));

    let create_request = HealthRecordCreateDBRequest {
        child_id,
        weight: request.weight,
        height: request.height,
        bmi,
        nutrition_status: status,
        doctor_notes: request.doctor_notes,
        record_date,
    };

    let record = HealthRecords::new(&mut tx).create(&create_request).await?;

    // Raise the alert inside the same transaction so a failed insert
    // never leaves a record without its alert or vice versa.
    if let Some(recommendation) = growth::alert_for(status) {
        let alert_request = AlertCreateDBRequest {
            child_id,
            alert_type: recommendation.alert_type,
            message: recommendation.message.to_string(),
        };
        Alerts::new(&mut tx).create(&alert_request).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(HealthRecordResponse::from(record))))
}

/// Get a single health record
#[utoipa::path(
    get,
    path = "/health-records/{id}",
    tag = "health-records",
    summary = "Get health record",
    params(("id" = String, Path, format = "uuid", description = "Health record ID")),
    responses(
        (status = 200, description = "Health record", body = HealthRecordResponse),
        (status = 404, description = "Health record not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_health_record(
    State(state): State<AppState>,
    Path(id): Path<HealthRecordId>,
    user: RequiresPermission<resource::HealthRecords, operation::ReadOwn>,
) -> Result<Json<HealthRecordResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let record = HealthRecords::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Health record".to_string(),
            id: id.to_string(),
        })?;

    // Ownership flows through the child.
    load_child_scoped(&mut conn, &user, record.child_id).await?;

    Ok(Json(HealthRecordResponse::from(record)))
}

/// Correct a health record's measurements
#[utoipa::path(
    patch,
    path = "/health-records/{id}",
    tag = "health-records",
    summary = "Update health record",
    params(("id" = String, Path, format = "uuid", description = "Health record ID")),
    request_body = HealthRecordUpdate,
    responses(
        (status = 200, description = "Updated health record", body = HealthRecordResponse),
        (status = 400, description = "Invalid measurements"),
        (status = 404, description = "Health record not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_health_record(
    State(state): State<AppState>,
    Path(id): Path<HealthRecordId>,
    user: RequiresPermission<resource::HealthRecords, operation::UpdateAll>,
    Json(update): Json<HealthRecordUpdate>,
) -> Result<Json<HealthRecordResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let existing = HealthRecords::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Health record".to_string(),
            id: id.to_string(),
        })?;

    let child = load_child_scoped(&mut conn, &user, existing.child_id).await?;

    let weight = update.weight.unwrap_or(existing.weight);
    let height = update.height.unwrap_or(existing.height);
    validate_measurements(weight, height)?;

    // Recompute derived values from the merged measurements.
    let bmi = growth::bmi(weight, height);
    let age_months = crate::domain::age::age_in_months(child.date_of_birth, Utc::now().date_naive());
    let status = growth::classify(bmi, Some(age_months), Some(child.gender));

    let db_update = HealthRecordUpdateDBRequest {
        weight,
        height,
        bmi,
        nutrition_status: status,
        doctor_notes: update.doctor_notes.or(existing.doctor_notes),
        record_date: update.record_date.unwrap_or(existing.record_date),
    };

    let record = HealthRecords::new(&mut conn).update(id, &db_update).await?;
    Ok(Json(HealthRecordResponse::from(record)))
}

/// Delete a health record
#[utoipa::path(
    delete,
    path = "/health-records/{id}",
    tag = "health-records",
    summary = "Delete health record",
    params(("id" = String, Path, format = "uuid", description = "Health record ID")),
    responses(
        (status = 204, description = "Health record deleted"),
        (status = 404, description = "Health record not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_health_record(
    State(state): State<AppState>,
    Path(id): Path<HealthRecordId>,
    user: RequiresPermission<resource::HealthRecords, operation::DeleteAll>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let record = HealthRecords::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Health record".to_string(),
            id: id.to_string(),
        })?;

    load_child_scoped(&mut conn, &user, record.child_id).await?;

    HealthRecords::new(&mut conn).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Growth trend for one child, oldest record first
#[utoipa::path(
    get,
    path = "/children/{id}/growth-trend",
    tag = "health-records",
    summary = "Growth trend",
    params(("id" = String, Path, format = "uuid", description = "Child ID")),
    responses(
        (status = 200, description = "Growth trend", body = GrowthTrendResponse),
        (status = 404, description = "Child not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn growth_trend(
    State(state): State<AppState>,
    Path(child_id): Path<ChildId>,
    user: RequiresPermission<resource::HealthRecords, operation::ReadOwn>,
) -> Result<Json<GrowthTrendResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_child_scoped(&mut conn, &user, child_id).await?;

    let records = HealthRecords::new(&mut conn).growth_trend(child_id).await?;
    let points = records.into_iter().map(GrowthTrendPoint::from).collect();

    Ok(Json(GrowthTrendResponse { child_id, points }))
}
