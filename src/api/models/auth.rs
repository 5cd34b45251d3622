//! API request/response models for authentication.

use crate::api::models::users::{Role, UserResponse};
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to register a new account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Full name
    pub name: String,
    /// Email address (must be unique)
    pub email: String,
    /// Optional contact phone number
    pub phone: Option<String>,
    /// Account role (mother or doctor)
    pub role: Role,
    /// Password (will be hashed)
    pub password: String,
    /// Must match `password` exactly
    pub confirm: String,
}

/// Request to login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Request to change the current user's password
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PasswordChangeRequest {
    /// Current password, verified before the change is applied
    pub current_password: String,
    /// New password
    pub new_password: String,
}

/// Response after successful login or registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// User information
    pub user: UserResponse,
    /// Success message
    pub message: String,
}

/// Generic success response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthSuccessResponse {
    pub message: String,
}

/// Structured response for successful registration, sets the session cookie
pub struct RegisterResponse {
    pub auth_response: AuthResponse,
    pub cookie: String,
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        if let Ok(value) = self.cookie.parse() {
            headers.insert(header::SET_COOKIE, value);
        }
        (StatusCode::CREATED, headers, Json(self.auth_response)).into_response()
    }
}

/// Structured response for successful login, sets the session cookie
pub struct LoginResponse {
    pub auth_response: AuthResponse,
    pub cookie: String,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        if let Ok(value) = self.cookie.parse() {
            headers.insert(header::SET_COOKIE, value);
        }
        (StatusCode::OK, headers, Json(self.auth_response)).into_response()
    }
}

/// Structured response for logout, clears the session cookie
pub struct LogoutResponse {
    pub cookie: String,
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        if let Ok(value) = self.cookie.parse() {
            headers.insert(header::SET_COOKIE, value);
        }
        (
            StatusCode::OK,
            headers,
            Json(AuthSuccessResponse {
                message: "Logged out".to_string(),
            }),
        )
            .into_response()
    }
}
