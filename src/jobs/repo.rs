use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::db::DbResult;

/// A `pekerjaan` row.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    #[serde(rename = "namapekerjaan")]
    #[sqlx(rename = "namapekerjaan")]
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait JobRepo: Send + Sync {
    async fn list(&self, limit: i64, offset: i64) -> DbResult<(Vec<Job>, i64)>;
    async fn get(&self, id: i32) -> DbResult<Option<Job>>;
    async fn create(&self, name: &str) -> DbResult<Job>;
    async fn update(&self, id: i32, name: &str) -> DbResult<Option<Job>>;
    /// False when nothing was deleted. Rows referenced elsewhere fail with
    /// `DbError::ForeignKeyViolation`.
    async fn delete(&self, id: i32) -> DbResult<bool>;
}

#[derive(Clone)]
pub struct PgJobRepo {
    db: PgPool,
}

impl PgJobRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobRepo for PgJobRepo {
    async fn list(&self, limit: i64, offset: i64) -> DbResult<(Vec<Job>, i64)> {
        let mut tx = self.db.begin().await?;
        let rows = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, namapekerjaan, created_at, updated_at
              FROM pekerjaan
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pekerjaan")
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok((rows, total))
    }

    async fn get(&self, id: i32) -> DbResult<Option<Job>> {
        let row = sqlx::query_as::<_, Job>(
            "SELECT id, namapekerjaan, created_at, updated_at FROM pekerjaan WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, name: &str) -> DbResult<Job> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO pekerjaan (namapekerjaan)
            VALUES ($1)
            RETURNING id, namapekerjaan, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, name: &str) -> DbResult<Option<Job>> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            UPDATE pekerjaan
               SET namapekerjaan = $2, updated_at = now()
             WHERE id = $1
            RETURNING id, namapekerjaan, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> DbResult<bool> {
        let res = sqlx::query("DELETE FROM pekerjaan WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
