//! Database repository for immunizations.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::immunizations::{
        ImmunizationCreateDBRequest, ImmunizationDBResponse, ImmunizationUpdateDBRequest,
        ImmunizationWithChildDBResponse,
    },
};
use crate::types::{abbrev_uuid, ChildId, ImmunizationId, UserId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing immunizations, always scoped to one child
#[derive(Debug, Clone)]
pub struct ImmunizationFilter {
    pub child_id: ChildId,
    pub skip: i64,
    pub limit: i64,
}

impl ImmunizationFilter {
    pub fn new(child_id: ChildId, skip: i64, limit: i64) -> Self {
        Self {
            child_id,
            skip,
            limit,
        }
    }
}

pub struct Immunizations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Immunizations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Every recorded dose with the child's name, for coverage reports.
    #[instrument(skip(self), err)]
    pub async fn list_all(&mut self) -> Result<Vec<ImmunizationWithChildDBResponse>> {
        let rows = sqlx::query_as::<_, ImmunizationWithChildDBResponse>(
            r#"
            SELECT i.*, c.name AS child_name
            FROM immunizations i
            JOIN children c ON c.id = i.child_id
            ORDER BY i.date_given DESC
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;
        Ok(rows)
    }

    /// Doses that still have a next due date, optionally scoped to one
    /// mother's children. Upcoming/overdue classification happens in
    /// the caller against today's date.
    #[instrument(skip(self), err)]
    pub async fn list_with_due_dates(
        &mut self,
        mother_id: Option<UserId>,
    ) -> Result<Vec<ImmunizationWithChildDBResponse>> {
        let rows = sqlx::query_as::<_, ImmunizationWithChildDBResponse>(
            r#"
            SELECT i.*, c.name AS child_name
            FROM immunizations i
            JOIN children c ON c.id = i.child_id
            WHERE i.next_due_date IS NOT NULL
              AND ($1::uuid IS NULL OR c.mother_id = $1)
            ORDER BY i.next_due_date ASC
            "#,
        )
        .bind(mother_id)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(rows)
    }

    /// Total recorded doses, used by the health summary.
    #[instrument(skip(self), err)]
    pub async fn count_all(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM immunizations")
            .fetch_one(&mut *self.db)
            .await?;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Immunizations<'c> {
    type CreateRequest = ImmunizationCreateDBRequest;
    type UpdateRequest = ImmunizationUpdateDBRequest;
    type Response = ImmunizationDBResponse;
    type Id = ImmunizationId;
    type Filter = ImmunizationFilter;

    #[instrument(skip(self, request), fields(child_id = %abbrev_uuid(&request.child_id), vaccine = %request.vaccine_name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let immunization_id = Uuid::new_v4();

        let row = sqlx::query_as::<_, ImmunizationDBResponse>(
            r#"
            INSERT INTO immunizations (id, child_id, vaccine_name, date_given, next_due_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(immunization_id)
        .bind(request.child_id)
        .bind(&request.vaccine_name)
        .bind(request.date_given)
        .bind(request.next_due_date)
        .bind(&request.notes)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row)
    }

    #[instrument(skip(self), fields(immunization_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let row =
            sqlx::query_as::<_, ImmunizationDBResponse>("SELECT * FROM immunizations WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;
        Ok(row)
    }

    #[instrument(skip(self, filter), fields(child_id = %abbrev_uuid(&filter.child_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let rows = sqlx::query_as::<_, ImmunizationDBResponse>(
            r#"
            SELECT * FROM immunizations
            WHERE child_id = $1
            ORDER BY date_given DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.child_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(rows)
    }

    #[instrument(skip(self, filter), err)]
    async fn count(&mut self, filter: &Self::Filter) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM immunizations WHERE child_id = $1")
            .bind(filter.child_id)
            .fetch_one(&mut *self.db)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self), fields(immunization_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM immunizations WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(immunization_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // next_due_date distinguishes "unchanged" from "cleared", so it
        // cannot go through COALESCE like the other fields.
        let row = sqlx::query_as::<_, ImmunizationDBResponse>(
            r#"
            UPDATE immunizations SET
                vaccine_name = COALESCE($2, vaccine_name),
                date_given = COALESCE($3, date_given),
                next_due_date = CASE WHEN $4 THEN $5 ELSE next_due_date END,
                notes = COALESCE($6, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.vaccine_name)
        .bind(request.date_given)
        .bind(request.next_due_date.is_some())
        .bind(request.next_due_date.flatten())
        .bind(&request.notes)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(row)
    }
}
