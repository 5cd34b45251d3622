//! Aggregate report handlers, doctor only.

use crate::api::models::reports::{
    HealthSummaryReport, MissingChild, NutritionBreakdown, VaccinationCoverageReport,
    VaccineCoverage,
};
use crate::api::models::users::Role;
use crate::auth::permissions::{operation, resource, RequiresPermission};
use crate::db::handlers::{Alerts, Children, HealthRecords, Immunizations, Users};
use crate::domain::coverage;
use crate::domain::growth::NutritionStatus;
use crate::errors::{Error, Result};
use crate::types::ChildId;
use crate::AppState;
use axum::{extract::State, Json};
use std::collections::HashMap;

/// Vaccination coverage report over the canonical vaccine list.
///
/// A child counts as covered for a vaccine when any recorded dose name
/// contains the canonical name, case-insensitively.
#[utoipa::path(
    get,
    path = "/reports/vaccination-coverage",
    tag = "reports",
    summary = "Vaccination coverage",
    responses(
        (status = 200, description = "Coverage report", body = VaccinationCoverageReport),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn vaccination_coverage(
    State(state): State<AppState>,
    _user: RequiresPermission<resource::Reports, operation::ReadAll>,
) -> Result<Json<VaccinationCoverageReport>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let children = Children::new(&mut conn).list_all().await?;
    let doses = Immunizations::new(&mut conn).list_all().await?;

    let cohort: Vec<ChildId> = children.iter().map(|child| child.id).collect();
    let dose_pairs: Vec<(ChildId, &str)> = doses
        .iter()
        .map(|dose| (dose.child_id, dose.vaccine_name.as_str()))
        .collect();
    let names: HashMap<ChildId, &str> = children
        .iter()
        .map(|child| (child.id, child.name.as_str()))
        .collect();

    let summary = coverage::aggregate_coverage(&cohort, &dose_pairs);

    let report = summary
        .per_vaccine
        .into_iter()
        .map(|vaccine| VaccineCoverage {
            vaccine_name: vaccine.vaccine_name.to_string(),
            children_given: vaccine.covered.len() as i64,
            percentage: coverage::coverage_percentage(vaccine.covered.len(), cohort.len()),
            missing: vaccine
                .missing
                .iter()
                .filter_map(|child_id| {
                    names.get(child_id).map(|name| MissingChild {
                        child_id: *child_id,
                        name: (*name).to_string(),
                    })
                })
                .collect(),
        })
        .collect();

    Ok(Json(VaccinationCoverageReport {
        total_children: cohort.len() as i64,
        coverage: report,
        average_vaccines_per_child: summary.average_per_child,
    }))
}

/// Cohort-wide health summary for the reports dashboard
#[utoipa::path(
    get,
    path = "/reports/health-summary",
    tag = "reports",
    summary = "Health summary",
    responses(
        (status = 200, description = "Health summary", body = HealthSummaryReport),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn health_summary(
    State(state): State<AppState>,
    _user: RequiresPermission<resource::Reports, operation::ReadAll>,
) -> Result<Json<HealthSummaryReport>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let total_children = Children::new(&mut conn).count_all().await?;
    let total_mothers = Users::new(&mut conn).count_by_role(Role::Mother).await?;
    let total_immunizations = Immunizations::new(&mut conn).count_all().await?;

    let mut records_repo = HealthRecords::new(&mut conn);
    let records = records_repo.statistics().await?;
    let status_counts = records_repo.latest_status_counts().await?;

    let mut nutrition = NutritionBreakdown::default();
    for (status, count) in status_counts {
        match status {
            NutritionStatus::Underweight => nutrition.underweight = count,
            NutritionStatus::Normal => nutrition.normal = count,
            NutritionStatus::Overweight => nutrition.overweight = count,
            NutritionStatus::Obese => nutrition.obese = count,
        }
    }

    let alerts = Alerts::new(&mut conn).statistics().await?;

    Ok(Json(HealthSummaryReport {
        total_children,
        total_mothers,
        total_immunizations,
        children_unmonitored: total_children - records.children_monitored,
        records,
        alerts,
        nutrition,
    }))
}
