//! Child health monitoring service.
//!
//! A REST API for community health facilities tracking the growth and
//! immunization schedules of young children, together with maternal
//! health history. Doctors record measurements and doses; mothers
//! follow their own children. The service computes BMI-based nutrition
//! classifications, raises alerts for under- and overweight children,
//! and aggregates cohort-wide coverage reports.
//!
//! # Architecture
//!
//! - **[`api`]**: Axum handlers and request/response models
//! - **[`db`]**: repositories and row models over PostgreSQL via sqlx
//! - **[`domain`]**: pure growth, schedule and coverage computations
//! - **[`auth`]**: Argon2 passwords, JWT session cookies, role-based
//!   permissions
//! - **[`config`]**: YAML + environment configuration via figment
//!
//! **Background services** run alongside the HTTP server: a purge task
//! deletes resolved alerts past their retention window.
//!
//! # Usage
//!
//! ```no_run
//! use chms::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = chms::config::Args { config: "config.yaml".into(), validate: false };
//!     let config = Config::load(&args)?;
//!     chms::telemetry::init_telemetry()?;
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.ok();
//!     })
//!     .await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod openapi;
pub mod telemetry;
pub mod types;

use crate::{
    api::models::users::Role,
    auth::password,
    db::handlers::{Alerts, Repository, Users},
    db::models::users::UserCreateDBRequest,
    openapi::ApiDoc,
};
use axum::http::HeaderValue;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, instrument, warn, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{AlertId, ChildId, HealthRecordId, ImmunizationId, MotherHealthRecordId, UserId};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial doctor account if it doesn't exist.
///
/// Idempotent: when an account with the configured email already
/// exists it is left untouched. Nothing is created unless a bootstrap
/// password is configured.
#[instrument(skip_all)]
pub async fn create_initial_doctor(
    bootstrap: &config::BootstrapConfig,
    db: &PgPool,
) -> anyhow::Result<Option<UserId>> {
    let Some(password) = bootstrap.doctor_password.as_deref() else {
        debug!("No bootstrap doctor password configured, skipping");
        return Ok(None);
    };

    let password_hash = password::hash_string(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash bootstrap doctor password: {e}"))?;

    let mut tx = db.begin().await?;
    let mut users = Users::new(&mut tx);

    if let Some(existing) = users.get_by_email(&bootstrap.doctor_email).await? {
        tx.commit().await?;
        debug!("Bootstrap doctor account already exists");
        return Ok(Some(existing.id));
    }

    let create = UserCreateDBRequest {
        name: bootstrap.doctor_name.clone(),
        email: bootstrap.doctor_email.clone(),
        phone: None,
        role: Role::Doctor,
        password_hash,
    };
    let created = users.create(&create).await?;
    tx.commit().await?;

    info!(email = %bootstrap.doctor_email, "Created bootstrap doctor account");
    Ok(Some(created.id))
}

/// Connect to the database, run migrations and bootstrap the initial
/// doctor account.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPool::connect(&config.database_url).await?;
    migrator().run(&pool).await?;

    create_initial_doctor(&config.bootstrap, &pool).await?;

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut cors = CorsLayer::new().allow_credentials(config.cors.allow_credentials);

    if config.cors.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(tower_http::cors::Any);
    } else {
        let mut origins = Vec::new();
        for origin in &config.cors.allowed_origins {
            origins.push(origin.parse::<HeaderValue>()?);
        }
        cors = cors.allow_origin(origins);
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// Authentication routes sit at the root level; everything else is
/// nested under `/api/v1`. Interactive API documentation is served at
/// `/docs`.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let auth_routes = Router::new()
        .route("/authentication/register", post(api::handlers::auth::register))
        .route("/authentication/login", post(api::handlers::auth::login))
        .route("/authentication/logout", post(api::handlers::auth::logout))
        .route(
            "/authentication/password-change",
            post(api::handlers::auth::password_change),
        )
        .with_state(state.clone());

    let api_routes = Router::new()
        // User accounts
        .route("/users", get(api::handlers::users::list_users))
        .route("/users/me", get(api::handlers::users::get_current_user))
        .route("/users/{id}", get(api::handlers::users::get_user))
        .route("/users/{id}", patch(api::handlers::users::update_user))
        // Children
        .route("/children", get(api::handlers::children::list_children))
        .route("/children", post(api::handlers::children::create_child))
        .route("/children/{id}", get(api::handlers::children::get_child))
        .route("/children/{id}", patch(api::handlers::children::update_child))
        .route("/children/{id}", delete(api::handlers::children::delete_child))
        // Health records nested under children, plus direct record access
        .route(
            "/children/{id}/health-records",
            get(api::handlers::health_records::list_health_records)
                .post(api::handlers::health_records::create_health_record),
        )
        .route(
            "/children/{id}/growth-trend",
            get(api::handlers::health_records::growth_trend),
        )
        .route(
            "/health-records/{id}",
            get(api::handlers::health_records::get_health_record)
                .patch(api::handlers::health_records::update_health_record)
                .delete(api::handlers::health_records::delete_health_record),
        )
        // Immunizations. The schedule listings register before the
        // `{id}` route so "upcoming" and "overdue" are not parsed as IDs.
        .route(
            "/children/{id}/immunizations",
            get(api::handlers::immunizations::list_immunizations)
                .post(api::handlers::immunizations::create_immunization),
        )
        .route(
            "/immunizations/upcoming",
            get(api::handlers::immunizations::upcoming_immunizations),
        )
        .route(
            "/immunizations/overdue",
            get(api::handlers::immunizations::overdue_immunizations),
        )
        .route(
            "/immunizations/{id}",
            get(api::handlers::immunizations::get_immunization)
                .patch(api::handlers::immunizations::update_immunization)
                .delete(api::handlers::immunizations::delete_immunization),
        )
        // Maternal health records
        .route(
            "/mothers/{id}/health-records",
            get(api::handlers::mother_health_records::list_mother_health_records)
                .post(api::handlers::mother_health_records::create_mother_health_record),
        )
        .route(
            "/mothers/{id}/health-trend",
            get(api::handlers::mother_health_records::mother_health_trend),
        )
        .route(
            "/mother-health-records/{id}",
            get(api::handlers::mother_health_records::get_mother_health_record)
                .patch(api::handlers::mother_health_records::update_mother_health_record)
                .delete(api::handlers::mother_health_records::delete_mother_health_record),
        )
        // Alerts
        .route(
            "/alerts",
            get(api::handlers::alerts::list_alerts).post(api::handlers::alerts::create_alert),
        )
        .route(
            "/alerts/pending-count",
            get(api::handlers::alerts::pending_alert_count),
        )
        .route("/alerts/{id}", get(api::handlers::alerts::get_alert))
        .route("/alerts/{id}/resolve", post(api::handlers::alerts::resolve_alert))
        // Reports
        .route(
            "/reports/vaccination-coverage",
            get(api::handlers::reports::vaccination_coverage),
        )
        .route(
            "/reports/health-summary",
            get(api::handlers::reports::health_summary),
        )
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(auth_routes)
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Container for background services and their lifecycle management.
///
/// Currently this is the alert purge task, which periodically deletes
/// resolved alerts past the retention window. The `drop_guard` cancels
/// the shutdown token when dropped, stopping the tasks.
pub struct BackgroundServices {
    background_tasks: Vec<tokio::task::JoinHandle<()>>,
    shutdown_token: tokio_util::sync::CancellationToken,
    pub drop_guard: Option<tokio_util::sync::DropGuard>,
}

impl BackgroundServices {
    /// Gracefully shutdown all background tasks
    pub async fn shutdown(self) {
        self.shutdown_token.cancel();
        for handle in self.background_tasks {
            let _ = handle.await;
        }
    }
}

/// Setup background services (alert purge task)
fn setup_background_services(
    pool: PgPool,
    config: Config,
    shutdown_token: tokio_util::sync::CancellationToken,
) -> BackgroundServices {
    let drop_guard = shutdown_token.clone().drop_guard();
    let mut background_tasks = Vec::new();

    let purge_shutdown = shutdown_token.clone();
    let handle = tokio::spawn(async move {
        let retention_days = config.alerts.retention_days();
        let mut ticker = tokio::time::interval(config.alerts.purge_interval);
        // The first tick fires immediately, purging on startup.
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match purge_resolved_alerts(&pool, retention_days).await {
                        Ok(0) => {}
                        Ok(purged) => info!(purged, "Purged resolved alerts past retention"),
                        Err(e) => warn!("Alert purge failed: {e}"),
                    }
                }
                _ = purge_shutdown.cancelled() => {
                    debug!("Alert purge task shutting down");
                    break;
                }
            }
        }
    });
    background_tasks.push(handle);

    BackgroundServices {
        background_tasks,
        shutdown_token,
        drop_guard: Some(drop_guard),
    }
}

async fn purge_resolved_alerts(pool: &PgPool, retention_days: i64) -> anyhow::Result<u64> {
    let mut conn = pool.acquire().await?;
    let purged = Alerts::new(&mut conn).delete_old_resolved(retention_days).await?;
    Ok(purged)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, bootstraps the initial doctor account, and starts
///    background services
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and
///    handles requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
    bg_services: BackgroundServices,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;

        let shutdown_token = tokio_util::sync::CancellationToken::new();
        let bg_services = setup_background_services(pool.clone(), config.clone(), shutdown_token);

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self {
            router,
            config,
            pool,
            bg_services,
        })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Listening on http://{}, docs at http://localhost:{}/docs",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        self.bg_services.shutdown().await;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
