//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! The API is divided into several functional areas:
//!
//! - **Authentication** (`/api/v1/authentication/*`): registration, login,
//!   logout, password change
//! - **Users** (`/api/v1/users/*`): account listing and profile updates
//! - **Children** (`/api/v1/children/*`): child registration plus nested
//!   health-record, immunization and growth-trend routes
//! - **Health records** (`/api/v1/health-records/*`): individual record
//!   access and corrections
//! - **Immunizations** (`/api/v1/immunizations/*`): dose records and the
//!   upcoming/overdue schedule listings
//! - **Maternal records** (`/api/v1/mothers/*`, `/api/v1/mother-health-records/*`):
//!   maternal health history and vitals trend
//! - **Alerts** (`/api/v1/alerts/*`): nutrition alerts and resolution
//! - **Reports** (`/api/v1/reports/*`): cohort-wide aggregates, doctor only
//!
//! # OpenAPI Documentation
//!
//! All endpoints carry OpenAPI annotations via `utoipa`; interactive
//! documentation is served at `/docs` when the server is running.

pub mod handlers;
pub mod models;
