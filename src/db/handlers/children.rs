//! Database repository for children.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::children::{ChildCreateDBRequest, ChildDBResponse, ChildUpdateDBRequest},
};
use crate::types::{abbrev_uuid, ChildId, UserId};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing children
#[derive(Debug, Clone)]
pub struct ChildFilter {
    pub skip: i64,
    pub limit: i64,
    /// When set, only children belonging to this mother
    pub mother_id: Option<UserId>,
}

impl ChildFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip,
            limit,
            mother_id: None,
        }
    }

    pub fn for_mother(mut self, mother_id: UserId) -> Self {
        self.mother_id = Some(mother_id);
        self
    }
}

pub struct Children<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Children<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Every registered child, for cohort-wide reports.
    #[instrument(skip(self), err)]
    pub async fn list_all(&mut self) -> Result<Vec<ChildDBResponse>> {
        let children =
            sqlx::query_as::<_, ChildDBResponse>("SELECT * FROM children ORDER BY name ASC")
                .fetch_all(&mut *self.db)
                .await?;
        Ok(children)
    }

    /// Total number of registered children, used by reports.
    #[instrument(skip(self), err)]
    pub async fn count_all(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM children")
            .fetch_one(&mut *self.db)
            .await?;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Children<'c> {
    type CreateRequest = ChildCreateDBRequest;
    type UpdateRequest = ChildUpdateDBRequest;
    type Response = ChildDBResponse;
    type Id = ChildId;
    type Filter = ChildFilter;

    #[instrument(skip(self, request), fields(mother_id = %abbrev_uuid(&request.mother_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let child_id = Uuid::new_v4();

        let child = sqlx::query_as::<_, ChildDBResponse>(
            r#"
            INSERT INTO children (id, mother_id, name, date_of_birth, gender)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(child_id)
        .bind(request.mother_id)
        .bind(&request.name)
        .bind(request.date_of_birth)
        .bind(request.gender)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(child)
    }

    #[instrument(skip(self), fields(child_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let child = sqlx::query_as::<_, ChildDBResponse>("SELECT * FROM children WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        Ok(child)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let children = sqlx::query_as::<_, ChildDBResponse>(
            r#"
            SELECT * FROM children
            WHERE ($1::uuid IS NULL OR mother_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.mother_id)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;
        Ok(children)
    }

    #[instrument(skip(self, filter), err)]
    async fn count(&mut self, filter: &Self::Filter) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM children WHERE ($1::uuid IS NULL OR mother_id = $1)")
                .bind(filter.mother_id)
                .fetch_one(&mut *self.db)
                .await?;
        Ok(count)
    }

    #[instrument(skip(self), fields(child_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM children WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(child_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let child = sqlx::query_as::<_, ChildDBResponse>(
            r#"
            UPDATE children SET
                name = COALESCE($2, name),
                date_of_birth = COALESCE($3, date_of_birth),
                gender = COALESCE($4, gender),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.date_of_birth)
        .bind(request.gender)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(child)
    }
}
