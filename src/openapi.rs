//! OpenAPI documentation configuration.
//!
//! Defines the OpenAPI document for the API at `/api/v1/*`, served
//! interactively at `/docs`.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::api;

/// Session-cookie security scheme shared by every authenticated route.
struct SessionSecurityAddon;

impl Modify for SessionSecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "CookieAuth".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "chms_session",
                    "Session cookie set by the login and register endpoints.",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api/v1", description = "Child health monitoring API")
    ),
    modifiers(&SessionSecurityAddon),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::password_change,
        api::handlers::users::list_users,
        api::handlers::users::get_current_user,
        api::handlers::users::get_user,
        api::handlers::users::update_user,
        api::handlers::children::list_children,
        api::handlers::children::create_child,
        api::handlers::children::get_child,
        api::handlers::children::update_child,
        api::handlers::children::delete_child,
        api::handlers::health_records::list_health_records,
        api::handlers::health_records::create_health_record,
        api::handlers::health_records::get_health_record,
        api::handlers::health_records::update_health_record,
        api::handlers::health_records::delete_health_record,
        api::handlers::health_records::growth_trend,
        api::handlers::immunizations::list_immunizations,
        api::handlers::immunizations::create_immunization,
        api::handlers::immunizations::get_immunization,
        api::handlers::immunizations::update_immunization,
        api::handlers::immunizations::delete_immunization,
        api::handlers::immunizations::upcoming_immunizations,
        api::handlers::immunizations::overdue_immunizations,
        api::handlers::mother_health_records::list_mother_health_records,
        api::handlers::mother_health_records::create_mother_health_record,
        api::handlers::mother_health_records::mother_health_trend,
        api::handlers::mother_health_records::get_mother_health_record,
        api::handlers::mother_health_records::update_mother_health_record,
        api::handlers::mother_health_records::delete_mother_health_record,
        api::handlers::alerts::list_alerts,
        api::handlers::alerts::create_alert,
        api::handlers::alerts::pending_alert_count,
        api::handlers::alerts::get_alert,
        api::handlers::alerts::resolve_alert,
        api::handlers::reports::vaccination_coverage,
        api::handlers::reports::health_summary,
    ),
    components(
        schemas(
            api::models::auth::RegisterRequest,
            api::models::auth::LoginRequest,
            api::models::auth::PasswordChangeRequest,
            api::models::auth::AuthResponse,
            api::models::auth::AuthSuccessResponse,
            api::models::users::Role,
            api::models::users::UserUpdate,
            api::models::users::UserResponse,
            api::models::children::Gender,
            api::models::children::ChildCreate,
            api::models::children::ChildUpdate,
            api::models::children::ChildResponse,
            api::models::children::ChildDetailResponse,
            api::models::health_records::HealthRecordCreate,
            api::models::health_records::HealthRecordUpdate,
            api::models::health_records::HealthRecordResponse,
            api::models::health_records::GrowthTrendPoint,
            api::models::health_records::GrowthTrendResponse,
            api::models::immunizations::ImmunizationCreate,
            api::models::immunizations::ImmunizationUpdate,
            api::models::immunizations::ImmunizationResponse,
            api::models::immunizations::UpcomingImmunization,
            api::models::immunizations::OverdueImmunization,
            api::models::mother_health_records::MotherRecordType,
            api::models::mother_health_records::DeliveryType,
            api::models::mother_health_records::MotherHealthRecordCreate,
            api::models::mother_health_records::MotherHealthRecordUpdate,
            api::models::mother_health_records::MotherHealthRecordResponse,
            api::models::mother_health_records::MotherVitalsPoint,
            api::models::mother_health_records::MotherHealthTrendResponse,
            api::models::alerts::AlertCreate,
            api::models::alerts::AlertResponse,
            api::models::alerts::PendingAlertCount,
            api::models::reports::VaccineCoverage,
            api::models::reports::MissingChild,
            api::models::reports::VaccinationCoverageReport,
            api::models::reports::NutritionBreakdown,
            api::models::reports::HealthRecordStatistics,
            api::models::reports::AlertStatistics,
            api::models::reports::HealthSummaryReport,
            crate::db::models::alerts::AlertType,
            crate::db::models::alerts::AlertStatus,
            crate::domain::growth::NutritionStatus,
        )
    ),
    tags(
        (name = "authentication", description = "Session management"),
        (name = "users", description = "User accounts"),
        (name = "children", description = "Child registration"),
        (name = "health-records", description = "Growth measurements and trends"),
        (name = "immunizations", description = "Vaccine doses and schedules"),
        (name = "mother-health-records", description = "Maternal health history"),
        (name = "alerts", description = "Nutrition alerts"),
        (name = "reports", description = "Cohort-wide aggregates"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builds_with_schemas_and_security() {
        let doc = ApiDoc::openapi();

        let components = doc.components.expect("document should have components");
        assert!(components.schemas.contains_key("ChildResponse"));
        assert!(components.schemas.contains_key("AlertResponse"));
        assert!(components.security_schemes.contains_key("CookieAuth"));

        assert!(doc.paths.paths.contains_key("/children"));
        assert!(doc.paths.paths.contains_key("/alerts"));
    }
}
