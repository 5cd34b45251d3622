//! Database repository for health alerts.

use crate::api::models::reports::AlertStatistics;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{Never, Repository},
    models::alerts::{AlertCreateDBRequest, AlertDBResponse, AlertStatus},
};
use crate::types::{abbrev_uuid, AlertId, ChildId, UserId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing alerts
#[derive(Debug, Clone)]
pub struct AlertFilter {
    pub skip: i64,
    pub limit: i64,
    pub status: Option<AlertStatus>,
    pub child_id: Option<ChildId>,
    /// When set, only alerts for this mother's children
    pub mother_id: Option<UserId>,
}

impl AlertFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            status: None,
            child_id: None,
            mother_id: None,
        }
    }

    pub fn with_status(mut self, status: AlertStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn for_child(mut self, child_id: ChildId) -> Self {
        self.child_id = Some(child_id);
        self
    }

    pub fn for_mother(mut self, mother_id: UserId) -> Self {
        self.mother_id = Some(mother_id);
        self
    }
}

pub struct Alerts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Alerts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Mark an alert resolved. Resolving an already-resolved alert is
    /// a no-op that returns the row unchanged, so the original
    /// resolution timestamp is preserved.
    #[instrument(skip(self), fields(alert_id = %abbrev_uuid(&id)), err)]
    pub async fn resolve(&mut self, id: AlertId) -> Result<AlertDBResponse> {
        let alert = sqlx::query_as::<_, AlertDBResponse>(
            r#"
            UPDATE alerts SET
                status = 'resolved',
                resolved_at = COALESCE(resolved_at, NOW())
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(alert)
    }

    /// Count of pending alerts, optionally scoped to one mother's
    /// children.
    #[instrument(skip(self), err)]
    pub async fn pending_count(&mut self, mother_id: Option<UserId>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM alerts a
            JOIN children c ON c.id = a.child_id
            WHERE a.status = 'pending'
              AND ($1::uuid IS NULL OR c.mother_id = $1)
            "#,
        )
        .bind(mother_id)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(count)
    }

    /// Pending and resolved totals for the health summary report.
    #[instrument(skip(self), err)]
    pub async fn statistics(&mut self) -> Result<AlertStatistics> {
        let rows: Vec<(AlertStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM alerts GROUP BY status")
                .fetch_all(&mut *self.db)
                .await?;

        let mut stats = AlertStatistics::default();
        for (status, count) in rows {
            match status {
                AlertStatus::Pending => stats.pending = count,
                AlertStatus::Resolved => stats.resolved = count,
            }
        }
        Ok(stats)
    }

    /// Purge resolved alerts older than the retention window. Pending
    /// alerts are never purged regardless of age.
    #[instrument(skip(self), err)]
    pub async fn delete_old_resolved(&mut self, retention_days: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM alerts
            WHERE status = 'resolved'
              AND resolved_at IS NOT NULL
              AND resolved_at < NOW() - make_interval(days => $1::int)
            "#,
        )
        .bind(retention_days)
        .execute(&mut *self.db)
        .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Alerts<'c> {
    type CreateRequest = AlertCreateDBRequest;
    type UpdateRequest = Never;
    type Response = AlertDBResponse;
    type Id = AlertId;
    type Filter = AlertFilter;

    #[instrument(skip(self, request), fields(child_id = %abbrev_uuid(&request.child_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let alert_id = Uuid::new_v4();

        let alert = sqlx::query_as::<_, AlertDBResponse>(
            r#"
            INSERT INTO alerts (id, child_id, alert_type, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(alert_id)
        .bind(request.child_id)
        .bind(request.alert_type)
        .bind(&request.message)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(alert)
    }

    #[instrument(skip(self), fields(alert_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let alert = sqlx::query_as::<_, AlertDBResponse>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(alert)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let alerts = sqlx::query_as::<_, AlertDBResponse>(
            r#"
            SELECT a.*
            FROM alerts a
            JOIN children c ON c.id = a.child_id
            WHERE ($1::alert_status IS NULL OR a.status = $1)
              AND ($2::uuid IS NULL OR a.child_id = $2)
              AND ($3::uuid IS NULL OR c.mother_id = $3)
            ORDER BY a.created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.status)
        .bind(filter.child_id)
        .bind(filter.mother_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(alerts)
    }

    #[instrument(skip(self, filter), err)]
    async fn count(&mut self, filter: &Self::Filter) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM alerts a
            JOIN children c ON c.id = a.child_id
            WHERE ($1::alert_status IS NULL OR a.status = $1)
              AND ($2::uuid IS NULL OR a.child_id = $2)
              AND ($3::uuid IS NULL OR c.mother_id = $3)
            "#,
        )
        .bind(filter.status)
        .bind(filter.child_id)
        .bind(filter.mother_id)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(count)
    }

    #[instrument(skip(self), fields(alert_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Alerts move through their lifecycle via [`Alerts::resolve`];
    /// arbitrary field updates are not supported.
    async fn update(&mut self, _id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        match *request {}
    }
}
