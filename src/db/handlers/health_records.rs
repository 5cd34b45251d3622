//! Database repository for child health records.

use crate::api::models::reports::HealthRecordStatistics;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::health_records::{
        HealthRecordCreateDBRequest, HealthRecordDBResponse, HealthRecordUpdateDBRequest,
    },
};
use crate::domain::growth::NutritionStatus;
use crate::types::{abbrev_uuid, ChildId, HealthRecordId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing health records, always scoped to one child
#[derive(Debug, Clone)]
pub struct HealthRecordFilter {
    pub child_id: ChildId,
    pub skip: i64,
    pub limit: i64,
}

impl HealthRecordFilter {
    pub fn new(child_id: ChildId, skip: i64, limit: i64) -> Self {
        Self {
            child_id,
            skip,
            limit,
        }
    }
}

pub struct HealthRecords<'c> {
    db: &'c mut PgConnection,
}

impl<'c> HealthRecords<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Most recent record for a child. Ties on record_date resolve by
    /// insertion order, newest first.
    #[instrument(skip(self), fields(child_id = %abbrev_uuid(&child_id)), err)]
    pub async fn latest_for_child(
        &mut self,
        child_id: ChildId,
    ) -> Result<Option<HealthRecordDBResponse>> {
        let record = sqlx::query_as::<_, HealthRecordDBResponse>(
            r#"
            SELECT * FROM health_records
            WHERE child_id = $1
            ORDER BY record_date DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(child_id)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(record)
    }

    /// All records for a child oldest first, for growth-trend charting.
    #[instrument(skip(self), fields(child_id = %abbrev_uuid(&child_id)), err)]
    pub async fn growth_trend(&mut self, child_id: ChildId) -> Result<Vec<HealthRecordDBResponse>> {
        let records = sqlx::query_as::<_, HealthRecordDBResponse>(
            r#"
            SELECT * FROM health_records
            WHERE child_id = $1
            ORDER BY record_date ASC, created_at ASC
            "#,
        )
        .bind(child_id)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(records)
    }

    /// Aggregate record statistics for the health summary report.
    #[instrument(skip(self), err)]
    pub async fn statistics(&mut self) -> Result<HealthRecordStatistics> {
        let row: (i64, i64, Option<f64>, Option<f64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(DISTINCT child_id),
                   AVG(weight),
                   AVG(height)
            FROM health_records
            "#,
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(HealthRecordStatistics {
            total_records: row.0,
            children_monitored: row.1,
            average_weight: row.2,
            average_height: row.3,
        })
    }

    /// Nutrition status of each monitored child's latest record,
    /// grouped into counts per status.
    #[instrument(skip(self), err)]
    pub async fn latest_status_counts(&mut self) -> Result<Vec<(NutritionStatus, i64)>> {
        let rows: Vec<(NutritionStatus, i64)> = sqlx::query_as(
            r#"
            SELECT nutrition_status, COUNT(*)
            FROM (
                SELECT DISTINCT ON (child_id) nutrition_status
                FROM health_records
                ORDER BY child_id, record_date DESC, created_at DESC
            ) latest
            GROUP BY nutrition_status
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for HealthRecords<'c> {
    type CreateRequest = HealthRecordCreateDBRequest;
    type UpdateRequest = HealthRecordUpdateDBRequest;
    type Response = HealthRecordDBResponse;
    type Id = HealthRecordId;
    type Filter = HealthRecordFilter;

    #[instrument(skip(self, request), fields(child_id = %abbrev_uuid(&request.child_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let record_id = Uuid::new_v4();

        let record = sqlx::query_as::<_, HealthRecordDBResponse>(
            r#"
            INSERT INTO health_records
                (id, child_id, weight, height, bmi, nutrition_status, doctor_notes, record_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(record_id)
        .bind(request.child_id)
        .bind(request.weight)
        .bind(request.height)
        .bind(request.bmi)
        .bind(request.nutrition_status)
        .bind(&request.doctor_notes)
        .bind(request.record_date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(record)
    }

    #[instrument(skip(self), fields(record_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let record =
            sqlx::query_as::<_, HealthRecordDBResponse>("SELECT * FROM health_records WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;
        Ok(record)
    }

    #[instrument(skip(self, filter), fields(child_id = %abbrev_uuid(&filter.child_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let records = sqlx::query_as::<_, HealthRecordDBResponse>(
            r#"
            SELECT * FROM health_records
            WHERE child_id = $1
            ORDER BY record_date DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.child_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(records)
    }

    #[instrument(skip(self, filter), err)]
    async fn count(&mut self, filter: &Self::Filter) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM health_records WHERE child_id = $1")
            .bind(filter.child_id)
            .fetch_one(&mut *self.db)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self), fields(record_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM health_records WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(record_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let record = sqlx::query_as::<_, HealthRecordDBResponse>(
            r#"
            UPDATE health_records SET
                weight = $2,
                height = $3,
                bmi = $4,
                nutrition_status = $5,
                doctor_notes = $6,
                record_date = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.weight)
        .bind(request.height)
        .bind(request.bmi)
        .bind(request.nutrition_status)
        .bind(&request.doctor_notes)
        .bind(request.record_date)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(record)
    }
}
