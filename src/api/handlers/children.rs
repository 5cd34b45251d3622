//! Child registration and management handlers.

use crate::api::handlers::load_child_scoped;
use crate::api::models::children::{
    ChildCreate, ChildDetailResponse, ChildResponse, ChildUpdate, ListChildrenQuery,
};
use crate::api::models::health_records::HealthRecordResponse;
use crate::api::models::pagination::PaginatedResponse;
use crate::api::models::users::Role;
use crate::auth::permissions::{can_read_all_resources, operation, resource, RequiresPermission};
use crate::db::handlers::{ChildFilter, Children, HealthRecords, Repository, Users};
use crate::db::models::children::{ChildCreateDBRequest, ChildUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::{ChildId, Resource};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

/// List children visible to the caller
#[utoipa::path(
    get,
    path = "/children",
    tag = "children",
    summary = "List children",
    params(ListChildrenQuery),
    responses(
        (status = 200, description = "Paginated children", body = PaginatedResponse<ChildResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_children(
    State(state): State<AppState>,
    Query(query): Query<ListChildrenQuery>,
    user: RequiresPermission<resource::Children, operation::ReadOwn>,
) -> Result<Json<PaginatedResponse<ChildResponse>>> {
    let (skip, limit) = query.pagination.params();

    let mut filter = ChildFilter::new(skip, limit);
    if can_read_all_resources(&user, Resource::Children) {
        if let Some(mother_id) = query.mother_id {
            filter = filter.for_mother(mother_id);
        }
    } else {
        // Mothers always see exactly their own children.
        filter = filter.for_mother(user.id);
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Children::new(&mut conn);

    let children = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    let data = children.into_iter().map(ChildResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total_count, skip, limit)))
}

/// Register a child
#[utoipa::path(
    post,
    path = "/children",
    tag = "children",
    summary = "Register child",
    request_body = ChildCreate,
    responses(
        (status = 201, description = "Child registered", body = ChildResponse),
        (status = 400, description = "Invalid child data"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_child(
    State(state): State<AppState>,
    user: RequiresPermission<resource::Children, operation::CreateOwn>,
    Json(request): Json<ChildCreate>,
) -> Result<(StatusCode, Json<ChildResponse>)> {
    if request.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Name must not be empty".to_string(),
        });
    }

    if request.date_of_birth > Utc::now().date_naive() {
        return Err(Error::BadRequest {
            message: "Date of birth cannot be in the future".to_string(),
        });
    }

    // Mothers register children for themselves; doctors name the mother.
    let mother_id = if user.is_doctor() {
        request.mother_id.ok_or_else(|| Error::BadRequest {
            message: "mother_id is required".to_string(),
        })?
    } else {
        user.id
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let mother = Users::new(&mut conn)
        .get_by_id(mother_id)
        .await?
        .ok_or_else(|| Error::BadRequest {
            message: "Referenced mother does not exist".to_string(),
        })?;
    if mother.role != Role::Mother {
        return Err(Error::BadRequest {
            message: "Children can only be registered to mother accounts".to_string(),
        });
    }

    let create_request = ChildCreateDBRequest {
        mother_id,
        name: request.name,
        date_of_birth: request.date_of_birth,
        gender: request.gender,
    };

    let child = Children::new(&mut conn).create(&create_request).await?;
    Ok((StatusCode::CREATED, Json(ChildResponse::from(child))))
}

/// Get a single child
#[utoipa::path(
    get,
    path = "/children/{id}",
    tag = "children",
    summary = "Get child",
    params(("id" = String, Path, format = "uuid", description = "Child ID")),
    responses(
        (status = 200, description = "Child with latest health record", body = ChildDetailResponse),
        (status = 404, description = "Child not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_child(
    State(state): State<AppState>,
    Path(id): Path<ChildId>,
    user: RequiresPermission<resource::Children, operation::ReadOwn>,
) -> Result<Json<ChildDetailResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let child = load_child_scoped(&mut conn, &user, id).await?;
    let latest = HealthRecords::new(&mut conn).latest_for_child(id).await?;

    Ok(Json(ChildDetailResponse {
        child: ChildResponse::from(child),
        latest_record: latest.map(HealthRecordResponse::from),
    }))
}

/// Update a child's details
#[utoipa::path(
    patch,
    path = "/children/{id}",
    tag = "children",
    summary = "Update child",
    params(("id" = String, Path, format = "uuid", description = "Child ID")),
    request_body = ChildUpdate,
    responses(
        (status = 200, description = "Updated child", body = ChildResponse),
        (status = 404, description = "Child not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_child(
    State(state): State<AppState>,
    Path(id): Path<ChildId>,
    user: RequiresPermission<resource::Children, operation::UpdateOwn>,
    Json(update): Json<ChildUpdate>,
) -> Result<Json<ChildResponse>> {
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "Name must not be empty".to_string(),
            });
        }
    }
    if let Some(dob) = update.date_of_birth {
        if dob > Utc::now().date_naive() {
            return Err(Error::BadRequest {
                message: "Date of birth cannot be in the future".to_string(),
            });
        }
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_child_scoped(&mut conn, &user, id).await?;

    let child = Children::new(&mut conn)
        .update(id, &ChildUpdateDBRequest::from(update))
        .await?;
    Ok(Json(ChildResponse::from(child)))
}

/// Delete a child and all dependent records
#[utoipa::path(
    delete,
    path = "/children/{id}",
    tag = "children",
    summary = "Delete child",
    params(("id" = String, Path, format = "uuid", description = "Child ID")),
    responses(
        (status = 204, description = "Child deleted"),
        (status = 404, description = "Child not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_child(
    State(state): State<AppState>,
    Path(id): Path<ChildId>,
    user: RequiresPermission<resource::Children, operation::DeleteOwn>,
) -> Result<StatusCode> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    load_child_scoped(&mut conn, &user, id).await?;

    Children::new(&mut conn).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
