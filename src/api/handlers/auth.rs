//! Authentication handlers: register, login, logout and password
//! change.

use crate::api::models::auth::{
    AuthResponse, AuthSuccessResponse, LoginRequest, LoginResponse, LogoutResponse,
    PasswordChangeRequest, RegisterRequest, RegisterResponse,
};
use crate::api::models::users::{CurrentUser, UserResponse};
use crate::auth::{password, session};
use crate::db::handlers::{Repository, Users};
use crate::db::models::users::{UserCreateDBRequest, UserUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::AppState;
use axum::{extract::State, Json};

/// Minimal email shape check: one `@` with a non-empty local part and
/// a dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let Some((head, tail)) = domain.rsplit_once('.') else {
        return false;
    };
    !head.is_empty() && !tail.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
}

fn validate_password(password: &str, config: &crate::config::Config) -> Result<()> {
    let password_config = &config.auth.password;
    if password.len() < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if password.len() > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }
    Ok(())
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/authentication/register",
    tag = "authentication",
    summary = "Register a new account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid registration data"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Result<RegisterResponse> {
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "User registration is disabled".to_string(),
        });
    }

    if request.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Name must not be empty".to_string(),
        });
    }

    if !is_valid_email(&request.email) {
        return Err(Error::BadRequest {
            message: "Invalid email address".to_string(),
        });
    }

    validate_password(&request.password, &state.config)?;

    if request.password != request.confirm {
        return Err(Error::BadRequest {
            message: "Passwords do not match".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    // Check if user with this email already exists
    let mut user_repo = Users::new(&mut tx);
    if user_repo.get_by_email(&request.email).await?.is_some() {
        return Err(Error::BadRequest {
            message: "An account with this email address already exists".to_string(),
        });
    }

    // Hash the password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let create_request = UserCreateDBRequest {
        name: request.name,
        email: request.email,
        phone: request.phone,
        role: request.role,
        password_hash,
    };

    let created_user = user_repo.create(&create_request).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    let current_user = CurrentUser::from(created_user.clone());
    let token = session::create_session_token(&current_user, &state.config)?;
    let cookie = session::create_session_cookie(&token, &state.config);

    let auth_response = AuthResponse {
        user: UserResponse::from(created_user),
        message: "Registration successful".to_string(),
    };

    Ok(RegisterResponse { auth_response, cookie })
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/authentication/login",
    tag = "authentication",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<LoginResponse> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let user = Users::new(&mut conn).get_by_email(&request.email).await?;

    // Verify against a constant dummy hash when the user does not
    // exist, so response timing does not reveal registered emails.
    let (password_hash, user) = match user {
        Some(user) => (user.password_hash.clone(), Some(user)),
        None => (password::hash_string("invalid-password-placeholder")?, None),
    };

    let password_matches = tokio::task::spawn_blocking({
        let password = request.password.clone();
        move || password::verify_string(&password, &password_hash)
    })
    .await
    .map_err(|e| Error::Internal {
        operation: format!("spawn password verification task: {e}"),
    })??;

    let user = match (password_matches, user) {
        (true, Some(user)) => user,
        _ => {
            return Err(Error::Unauthenticated {
                message: Some("Invalid email or password".to_string()),
            })
        }
    };

    let current_user = CurrentUser::from(user.clone());
    let token = session::create_session_token(&current_user, &state.config)?;
    let cookie = session::create_session_cookie(&token, &state.config);

    let auth_response = AuthResponse {
        user: UserResponse::from(user),
        message: "Login successful".to_string(),
    };

    Ok(LoginResponse { auth_response, cookie })
}

/// Log out, clearing the session cookie
#[utoipa::path(
    post,
    path = "/authentication/logout",
    tag = "authentication",
    summary = "Log out",
    responses(
        (status = 200, description = "Logged out", body = AuthSuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> LogoutResponse {
    LogoutResponse {
        cookie: session::clear_session_cookie(&state.config),
    }
}

/// Change the current user's password
#[utoipa::path(
    post,
    path = "/authentication/password-change",
    tag = "authentication",
    summary = "Change password",
    request_body = PasswordChangeRequest,
    responses(
        (status = 200, description = "Password changed", body = AuthSuccessResponse),
        (status = 400, description = "Invalid new password"),
        (status = 401, description = "Current password incorrect"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn password_change(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<PasswordChangeRequest>,
) -> Result<Json<AuthSuccessResponse>> {
    validate_password(&request.new_password, &state.config)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut tx);

    let db_user = user_repo.get_by_id(user.id).await?.ok_or_else(|| Error::NotFound {
        resource: "User".to_string(),
        id: user.id.to_string(),
    })?;

    let current_matches = tokio::task::spawn_blocking({
        let current = request.current_password.clone();
        let hash = db_user.password_hash.clone();
        move || password::verify_string(&current, &hash)
    })
    .await
    .map_err(|e| Error::Internal {
        operation: format!("spawn password verification task: {e}"),
    })??;

    if !current_matches {
        return Err(Error::Unauthenticated {
            message: Some("Current password is incorrect".to_string()),
        });
    }

    let new_hash = tokio::task::spawn_blocking({
        let new_password = request.new_password.clone();
        move || password::hash_string(&new_password)
    })
    .await
    .map_err(|e| Error::Internal {
        operation: format!("spawn password hashing task: {e}"),
    })??;

    let update = UserUpdateDBRequest {
        password_hash: Some(new_hash),
        ..Default::default()
    };
    user_repo.update(user.id, &update).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(AuthSuccessResponse {
        message: "Password changed".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("mother@example.com"));
        assert!(is_valid_email("first.last@clinic.co.uk"));

        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodomain"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email(""));
    }
}
