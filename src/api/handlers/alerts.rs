//! Health alert handlers.

use crate::api::handlers::load_child_scoped;
use crate::api::models::alerts::{AlertCreate, AlertResponse, ListAlertsQuery, PendingAlertCount};
use crate::api::models::pagination::PaginatedResponse;
use crate::auth::permissions::{can_read_all_resources, operation, resource, RequiresPermission};
use crate::db::handlers::{AlertFilter, Alerts, Repository};
use crate::db::models::alerts::AlertCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::{AlertId, Resource};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// List alerts, newest first.
///
/// Doctors see the whole cohort; mothers see only alerts for their own
/// children.
#[utoipa::path(
    get,
    path = "/alerts",
    tag = "alerts",
    summary = "List alerts",
    params(ListAlertsQuery),
    responses(
        (status = 200, description = "Paginated alerts", body = PaginatedResponse<AlertResponse>),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<ListAlertsQuery>,
    user: RequiresPermission<resource::Alerts, operation::ReadOwn>,
) -> Result<Json<PaginatedResponse<AlertResponse>>> {
    let (skip, limit) = query.pagination.params();

    let mut filter = AlertFilter::new(skip, limit);
    if let Some(status) = query.status {
        filter = filter.with_status(status);
    }
    if let Some(child_id) = query.child_id {
        filter = filter.for_child(child_id);
    }
    if !can_read_all_resources(&user, Resource::Alerts) {
        filter = filter.for_mother(user.id);
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Alerts::new(&mut conn);
    let alerts = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    let data = alerts.into_iter().map(AlertResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total_count, skip, limit)))
}

/// Raise an alert manually, outside the automatic measurement flow
#[utoipa::path(
    post,
    path = "/alerts",
    tag = "alerts",
    summary = "Create alert",
    request_body = AlertCreate,
    responses(
        (status = 201, description = "Alert created", body = AlertResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Child not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_alert(
    State(state): State<AppState>,
    user: RequiresPermission<resource::Alerts, operation::CreateAll>,
    Json(request): Json<AlertCreate>,
) -> Result<(StatusCode, Json<AlertResponse>)> {
    if request.message.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Alert message cannot be empty".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_child_scoped(&mut conn, &user, request.child_id).await?;

    let create_request = AlertCreateDBRequest {
        child_id: request.child_id,
        alert_type: request.alert_type,
        message: request.message,
    };

    let alert = Alerts::new(&mut conn).create(&create_request).await?;
    Ok((StatusCode::CREATED, Json(AlertResponse::from(alert))))
}

/// Get a single alert
#[utoipa::path(
    get,
    path = "/alerts/{id}",
    tag = "alerts",
    summary = "Get alert",
    params(("id" = String, Path, format = "uuid", description = "Alert ID")),
    responses(
        (status = 200, description = "Alert", body = AlertResponse),
        (status = 404, description = "Alert not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<AlertId>,
    user: RequiresPermission<resource::Alerts, operation::ReadOwn>,
) -> Result<Json<AlertResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let alert = Alerts::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Alert".to_string(),
            id: id.to_string(),
        })?;

    // Ownership flows through the child; a miss reports the alert as
    // not found rather than leaking its existence.
    load_child_scoped(&mut conn, &user, alert.child_id)
        .await
        .map_err(|_| Error::NotFound {
            resource: "Alert".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(AlertResponse::from(alert)))
}

/// Mark an alert as resolved. Resolving twice is a no-op.
#[utoipa::path(
    post,
    path = "/alerts/{id}/resolve",
    tag = "alerts",
    summary = "Resolve alert",
    params(("id" = String, Path, format = "uuid", description = "Alert ID")),
    responses(
        (status = 200, description = "Resolved alert", body = AlertResponse),
        (status = 404, description = "Alert not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<AlertId>,
    user: RequiresPermission<resource::Alerts, operation::UpdateOwn>,
) -> Result<Json<AlertResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let alert = Alerts::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Alert".to_string(),
            id: id.to_string(),
        })?;

    load_child_scoped(&mut conn, &user, alert.child_id)
        .await
        .map_err(|_| Error::NotFound {
            resource: "Alert".to_string(),
            id: id.to_string(),
        })?;

    let resolved = Alerts::new(&mut conn).resolve(id).await?;
    Ok(Json(AlertResponse::from(resolved)))
}

/// Count of pending alerts, for the dashboard badge
#[utoipa::path(
    get,
    path = "/alerts/pending-count",
    tag = "alerts",
    summary = "Pending alert count",
    responses(
        (status = 200, description = "Pending alert count", body = PendingAlertCount),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn pending_alert_count(
    State(state): State<AppState>,
    user: RequiresPermission<resource::Alerts, operation::ReadOwn>,
) -> Result<Json<PendingAlertCount>> {
    let mother_scope = if can_read_all_resources(&user, Resource::Alerts) {
        None
    } else {
        Some(user.id)
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let pending = Alerts::new(&mut conn).pending_count(mother_scope).await?;
    Ok(Json(PendingAlertCount { pending }))
}
