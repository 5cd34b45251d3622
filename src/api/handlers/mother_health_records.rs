//! Maternal health record handlers.

use crate::api::models::mother_health_records::{
    ListMotherHealthRecordsQuery, MotherHealthRecordCreate, MotherHealthRecordResponse,
    MotherHealthRecordUpdate, MotherHealthTrendResponse, MotherVitalsPoint,
};
use crate::api::models::pagination::PaginatedResponse;
use crate::api::models::users::{CurrentUser, Role};
use crate::auth::permissions::{can_read_all_resources, operation, resource, RequiresPermission};
use crate::db::handlers::{MotherHealthRecordFilter, MotherHealthRecords, Repository, Users};
use crate::db::models::mother_health_records::{
    MotherHealthRecordCreateDBRequest, MotherHealthRecordUpdateDBRequest,
};
use crate::errors::{Error, Result};
use crate::types::{MotherHealthRecordId, Resource, UserId};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sqlx::PgConnection;

/// Reject access to another mother's records unless the caller can
/// read all maternal records. Misses report not found rather than
/// forbidden, so record existence is not leaked.
fn check_mother_scope(user: &CurrentUser, mother_id: UserId) -> Result<()> {
    if user.id == mother_id || can_read_all_resources(user, Resource::MotherHealthRecords) {
        Ok(())
    } else {
        Err(Error::NotFound {
            resource: "Mother".to_string(),
            id: mother_id.to_string(),
        })
    }
}

async fn ensure_mother_exists(conn: &mut PgConnection, mother_id: UserId) -> Result<()> {
    let mother = Users::new(conn)
        .get_by_id(mother_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Mother".to_string(),
            id: mother_id.to_string(),
        })?;
    if mother.role != Role::Mother {
        return Err(Error::BadRequest {
            message: "Maternal health records can only be created for mothers".to_string(),
        });
    }
    Ok(())
}

fn validate_vitals(
    weight: Option<f64>,
    hemoglobin: Option<f64>,
    blood_sugar: Option<f64>,
    pregnancy_week: Option<i32>,
) -> Result<()> {
    for (value, name) in [
        (weight, "Weight"),
        (hemoglobin, "Hemoglobin"),
        (blood_sugar, "Blood sugar"),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::BadRequest {
                    message: format!("{name} must be a positive number"),
                });
            }
        }
    }
    if let Some(week) = pregnancy_week {
        if week < 1 {
            return Err(Error::BadRequest {
                message: "Pregnancy week must be at least 1".to_string(),
            });
        }
    }
    Ok(())
}

/// List a mother's health records, newest first
#[utoipa::path(
    get,
    path = "/mothers/{id}/health-records",
    tag = "mother-health-records",
    summary = "List maternal records",
    params(
        ("id" = String, Path, format = "uuid", description = "Mother's user ID"),
        ListMotherHealthRecordsQuery,
    ),
    responses(
        (status = 200, description = "Paginated maternal records", body = PaginatedResponse<MotherHealthRecordResponse>),
        (status = 404, description = "Mother not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_mother_health_records(
    State(state): State<AppState>,
    Path(mother_id): Path<UserId>,
    Query(query): Query<ListMotherHealthRecordsQuery>,
    user: RequiresPermission<resource::MotherHealthRecords, operation::ReadOwn>,
) -> Result<Json<PaginatedResponse<MotherHealthRecordResponse>>> {
    check_mother_scope(&user, mother_id)?;
    let (skip, limit) = query.pagination.params();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    ensure_mother_exists(&mut conn, mother_id).await?;

    let mut filter = MotherHealthRecordFilter::new(mother_id, skip, limit);
    if let Some(record_type) = query.record_type {
        filter = filter.with_record_type(record_type);
    }

    let mut repo = MotherHealthRecords::new(&mut conn);
    let records = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    let data = records
        .into_iter()
        .map(MotherHealthRecordResponse::from)
        .collect();
    Ok(Json(PaginatedResponse::new(data, total_count, skip, limit)))
}

/// Create a maternal health record
#[utoipa::path(
    post,
    path = "/mothers/{id}/health-records",
    tag = "mother-health-records",
    summary = "Create maternal record",
    params(("id" = String, Path, format = "uuid", description = "Mother's user ID")),
    request_body = MotherHealthRecordCreate,
    responses(
        (status = 201, description = "Maternal record created", body = MotherHealthRecordResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Mother not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_mother_health_record(
    State(state): State<AppState>,
    Path(mother_id): Path<UserId>,
    _user: RequiresPermission<resource::MotherHealthRecords, operation::CreateAll>,
    Json(request): Json<MotherHealthRecordCreate>,
) -> Result<(StatusCode, Json<MotherHealthRecordResponse>)> {
    validate_vitals(
        request.weight,
        request.hemoglobin,
        request.blood_sugar,
        request.pregnancy_week,
    )?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    ensure_mother_exists(&mut conn, mother_id).await?;

    let record_date = request.record_date.unwrap_or_else(|| Utc::now().date_naive());
    let create_request = MotherHealthRecordCreateDBRequest {
        mother_id,
        record_type: request.record_type,
        weight: request.weight,
        blood_pressure: request.blood_pressure,
        hemoglobin: request.hemoglobin,
        blood_sugar: request.blood_sugar,
        pregnancy_week: request.pregnancy_week,
        delivery_date: request.delivery_date,
        delivery_type: request.delivery_type,
        complications: request.complications,
        medications: request.medications,
        doctor_notes: request.doctor_notes,
        next_checkup_date: request.next_checkup_date,
        record_date,
    };

    let record = MotherHealthRecords::new(&mut conn).create(&create_request).await?;
    Ok((
        StatusCode::CREATED,
        Json(MotherHealthRecordResponse::from(record)),
    ))
}

/// A mother's vitals over time, oldest record first
#[utoipa::path(
    get,
    path = "/mothers/{id}/health-trend",
    tag = "mother-health-records",
    summary = "Maternal vitals trend",
    params(("id" = String, Path, format = "uuid", description = "Mother's user ID")),
    responses(
        (status = 200, description = "Vitals trend", body = MotherHealthTrendResponse),
        (status = 404, description = "Mother not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn mother_health_trend(
    State(state): State<AppState>,
    Path(mother_id): Path<UserId>,
    user: RequiresPermission<resource::MotherHealthRecords, operation::ReadOwn>,
) -> Result<Json<MotherHealthTrendResponse>> {
    check_mother_scope(&user, mother_id)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    ensure_mother_exists(&mut conn, mother_id).await?;

    let records = MotherHealthRecords::new(&mut conn).trend(mother_id).await?;
    let points = records.into_iter().map(MotherVitalsPoint::from).collect();

    Ok(Json(MotherHealthTrendResponse { mother_id, points }))
}

/// Get a single maternal health record
#[utoipa::path(
    get,
    path = "/mother-health-records/{id}",
    tag = "mother-health-records",
    summary = "Get maternal record",
    params(("id" = String, Path, format = "uuid", description = "Maternal record ID")),
    responses(
        (status = 200, description = "Maternal record", body = MotherHealthRecordResponse),
        (status = 404, description = "Record not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_mother_health_record(
    State(state): State<AppState>,
    Path(id): Path<MotherHealthRecordId>,
    user: RequiresPermission<resource::MotherHealthRecords, operation::ReadOwn>,
) -> Result<Json<MotherHealthRecordResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let record = MotherHealthRecords::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Maternal health record".to_string(),
            id: id.to_string(),
        })?;

    check_mother_scope(&user, record.mother_id).map_err(|_| Error::NotFound {
        resource: "Maternal health record".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(MotherHealthRecordResponse::from(record)))
}

/// Correct a maternal health record
#[utoipa::path(
    patch,
    path = "/mother-health-records/{id}",
    tag = "mother-health-records",
    summary = "Update maternal record",
    params(("id" = String, Path, format = "uuid", description = "Maternal record ID")),
    request_body = MotherHealthRecordUpdate,
    responses(
        (status = 200, description = "Updated maternal record", body = MotherHealthRecordResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Record not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_mother_health_record(
    State(state): State<AppState>,
    Path(id): Path<MotherHealthRecordId>,
    _user: RequiresPermission<resource::MotherHealthRecords, operation::UpdateAll>,
    Json(update): Json<MotherHealthRecordUpdate>,
) -> Result<Json<MotherHealthRecordResponse>> {
    validate_vitals(
        update.weight,
        update.hemoglobin,
        update.blood_sugar,
        update.pregnancy_week,
    )?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let db_update = MotherHealthRecordUpdateDBRequest::from(update);
    let record = MotherHealthRecords::new(&mut conn)
        .update(id, &db_update)
        .await
        .map_err(|e| match e {
            crate::db::errors::DbError::NotFound => Error::NotFound {
                resource: "Maternal health record".to_string(),
                id: id.to_string(),
            },
            other => Error::Database(other),
        })?;

    Ok(Json(MotherHealthRecordResponse::from(record)))
}

/// Delete a maternal health record
#[utoipa::path(
    delete,
    path = "/mother-health-records/{id}",
    tag = "mother-health-records",
    summary = "Delete maternal record",
    params(("id" = String, Path, format = "uuid", description = "Maternal record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_mother_health_record(
    State(state): State<AppState>,
    Path(id): Path<MotherHealthRecordId>,
    _user: RequiresPermission<resource::MotherHealthRecords, operation::DeleteAll>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let deleted = MotherHealthRecords::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "Maternal health record".to_string(),
            id: id.to_string(),
        });
    }
    Ok(StatusCode::NO_CONTENT)
}
