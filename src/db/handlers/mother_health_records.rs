//! Database repository for maternal health records.

use crate::api::models::mother_health_records::MotherRecordType;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::mother_health_records::{
        MotherHealthRecordCreateDBRequest, MotherHealthRecordDBResponse,
        MotherHealthRecordUpdateDBRequest,
    },
};
use crate::types::{abbrev_uuid, MotherHealthRecordId, UserId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing maternal records, always scoped to one mother
#[derive(Debug, Clone)]
pub struct MotherHealthRecordFilter {
    pub mother_id: UserId,
    pub record_type: Option<MotherRecordType>,
    pub skip: i64,
    pub limit: i64,
}

impl MotherHealthRecordFilter {
    pub fn new(mother_id: UserId, skip: i64, limit: i64) -> Self {
        Self {
            mother_id,
            record_type: None,
            skip,
            limit,
        }
    }

    pub fn with_record_type(mut self, record_type: MotherRecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }
}

pub struct MotherHealthRecords<'c> {
    db: &'c mut PgConnection,
}

impl<'c> MotherHealthRecords<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// All records for a mother oldest first, for vitals charting.
    #[instrument(skip(self), fields(mother_id = %abbrev_uuid(&mother_id)), err)]
    pub async fn trend(&mut self, mother_id: UserId) -> Result<Vec<MotherHealthRecordDBResponse>> {
        let records = sqlx::query_as::<_, MotherHealthRecordDBResponse>(
            r#"
            SELECT * FROM mother_health_records
            WHERE mother_id = $1
            ORDER BY record_date ASC, created_at ASC
            "#,
        )
        .bind(mother_id)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(records)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for MotherHealthRecords<'c> {
    type CreateRequest = MotherHealthRecordCreateDBRequest;
    type UpdateRequest = MotherHealthRecordUpdateDBRequest;
    type Response = MotherHealthRecordDBResponse;
    type Id = MotherHealthRecordId;
    type Filter = MotherHealthRecordFilter;

    #[instrument(skip(self, request), fields(mother_id = %abbrev_uuid(&request.mother_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let record_id = Uuid::new_v4();

        let record = sqlx::query_as::<_, MotherHealthRecordDBResponse>(
            r#"
            INSERT INTO mother_health_records
                (id, mother_id, record_type, record_date, weight, blood_pressure, hemoglobin,
                 blood_sugar, pregnancy_week, delivery_date, delivery_type, complications,
                 medications, doctor_notes, next_checkup_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(record_id)
        .bind(request.mother_id)
        .bind(request.record_type)
        .bind(request.record_date)
        .bind(request.weight)
        .bind(&request.blood_pressure)
        .bind(request.hemoglobin)
        .bind(request.blood_sugar)
        .bind(request.pregnancy_week)
        .bind(request.delivery_date)
        .bind(request.delivery_type)
        .bind(&request.complications)
        .bind(&request.medications)
        .bind(&request.doctor_notes)
        .bind(request.next_checkup_date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(record)
    }

    #[instrument(skip(self), fields(record_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let record = sqlx::query_as::<_, MotherHealthRecordDBResponse>(
            "SELECT * FROM mother_health_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;
        Ok(record)
    }

    #[instrument(skip(self, filter), fields(mother_id = %abbrev_uuid(&filter.mother_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let records = sqlx::query_as::<_, MotherHealthRecordDBResponse>(
            r#"
            SELECT * FROM mother_health_records
            WHERE mother_id = $1
              AND ($2::mother_record_type IS NULL OR record_type = $2)
            ORDER BY record_date DESC, created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.mother_id)
        .bind(filter.record_type)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(records)
    }

    #[instrument(skip(self, filter), err)]
    async fn count(&mut self, filter: &Self::Filter) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM mother_health_records
            WHERE mother_id = $1
              AND ($2::mother_record_type IS NULL OR record_type = $2)
            "#,
        )
        .bind(filter.mother_id)
        .bind(filter.record_type)
        .fetch_one(&mut *self.db)
        .await?;
        Ok(count)
    }

    #[instrument(skip(self), fields(record_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM mother_health_records WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(record_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let record = sqlx::query_as::<_, MotherHealthRecordDBResponse>(
            r#"
            UPDATE mother_health_records SET
                weight = COALESCE($2, weight),
                blood_pressure = COALESCE($3, blood_pressure),
                hemoglobin = COALESCE($4, hemoglobin),
                blood_sugar = COALESCE($5, blood_sugar),
                pregnancy_week = COALESCE($6, pregnancy_week),
                delivery_date = COALESCE($7, delivery_date),
                delivery_type = COALESCE($8, delivery_type),
                complications = COALESCE($9, complications),
                medications = COALESCE($10, medications),
                doctor_notes = COALESCE($11, doctor_notes),
                next_checkup_date = COALESCE($12, next_checkup_date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.weight)
        .bind(&request.blood_pressure)
        .bind(request.hemoglobin)
        .bind(request.blood_sugar)
        .bind(request.pregnancy_week)
        .bind(request.delivery_date)
        .bind(request.delivery_type)
        .bind(&request.complications)
        .bind(&request.medications)
        .bind(&request.doctor_notes)
        .bind(request.next_checkup_date)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(record)
    }
}
