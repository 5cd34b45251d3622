//! User account handlers.

use crate::api::models::pagination::PaginatedResponse;
use crate::api::models::users::{CurrentUser, ListUsersQuery, UserResponse, UserUpdate};
use crate::auth::permissions::{operation, resource, RequiresPermission};
use crate::db::handlers::{Repository, UserFilter, Users};
use crate::db::models::users::UserUpdateDBRequest;
use crate::errors::{Error, Result};
use crate::types::{Operation, Permission, Resource, UserId};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};

/// List user accounts
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    summary = "List users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Paginated users", body = PaginatedResponse<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient permissions"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
    _: RequiresPermission<resource::Users, operation::ReadAll>,
) -> Result<Json<PaginatedResponse<UserResponse>>> {
    let (skip, limit) = query.pagination.params();

    let mut filter = UserFilter::new(skip, limit);
    if let Some(role) = query.role {
        filter = filter.with_role(role);
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut conn);

    let users = repo.list(&filter).await?;
    let total_count = repo.count(&filter).await?;

    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total_count, skip, limit)))
}

/// Get a single user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    summary = "Get user",
    params(("id" = String, Path, format = "uuid", description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    user: RequiresPermission<resource::Users, operation::ReadOwn>,
) -> Result<Json<UserResponse>> {
    // Mothers may only read themselves; doctors may read anyone.
    if user.id != id && !user.is_doctor() {
        return Err(Error::InsufficientPermissions {
            required: Permission::Allow(Resource::Users, Operation::ReadAll),
            action: Operation::ReadAll,
            resource: Resource::Users.to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let db_user = Users::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "User".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(UserResponse::from(db_user)))
}

/// Update the caller's own profile
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    summary = "Update user",
    params(("id" = String, Path, format = "uuid", description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "User not found"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    user: RequiresPermission<resource::Users, operation::UpdateOwn>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<UserResponse>> {
    // Profiles are personal: even doctors only edit their own.
    if user.id != id {
        return Err(Error::InsufficientPermissions {
            required: Permission::Allow(Resource::Users, Operation::UpdateOwn),
            action: Operation::UpdateOwn,
            resource: Resource::Users.to_string(),
        });
    }

    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(Error::BadRequest {
                message: "Name must not be empty".to_string(),
            });
        }
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let updated = Users::new(&mut conn)
        .update(id, &UserUpdateDBRequest::from(update))
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Get the currently authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    summary = "Current user",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_current_user(State(state): State<AppState>, user: CurrentUser) -> Result<Json<UserResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let db_user = Users::new(&mut conn)
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "User".to_string(),
            id: user.id.to_string(),
        })?;

    Ok(Json(UserResponse::from(db_user)))
}
