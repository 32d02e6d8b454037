use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::DbResult;

/// A `kriteria` row. `weight` is a percentage in [0, 100].
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: Uuid,
    #[serde(rename = "namakriteria")]
    #[sqlx(rename = "namakriteria")]
    pub name: String,
    #[serde(rename = "presentase")]
    #[sqlx(rename = "presentase")]
    pub weight: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionDeletion {
    Deleted,
    NotFound,
    HasSubCriteria,
}

#[async_trait]
pub trait CriterionRepo: Send + Sync {
    async fn list(&self, limit: i64, offset: i64) -> DbResult<(Vec<Criterion>, i64)>;
    async fn get(&self, id: Uuid) -> DbResult<Option<Criterion>>;
    async fn create(&self, name: &str, weight: f64) -> DbResult<Criterion>;
    async fn update(&self, id: Uuid, name: &str, weight: f64) -> DbResult<Option<Criterion>>;
    async fn delete(&self, id: Uuid) -> DbResult<CriterionDeletion>;
}

const COLUMNS: &str = "id, namakriteria, presentase, created_at, updated_at";

#[derive(Clone)]
pub struct PgCriterionRepo {
    db: PgPool,
}

impl PgCriterionRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CriterionRepo for PgCriterionRepo {
    async fn list(&self, limit: i64, offset: i64) -> DbResult<(Vec<Criterion>, i64)> {
        let mut tx = self.db.begin().await?;
        let rows = sqlx::query_as::<_, Criterion>(&format!(
            r#"
            SELECT {COLUMNS}
              FROM kriteria
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kriteria")
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok((rows, total))
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<Criterion>> {
        let row = sqlx::query_as::<_, Criterion>(&format!(
            "SELECT {COLUMNS} FROM kriteria WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, name: &str, weight: f64) -> DbResult<Criterion> {
        let row = sqlx::query_as::<_, Criterion>(&format!(
            r#"
            INSERT INTO kriteria (id, namakriteria, presentase)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(weight)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, name: &str, weight: f64) -> DbResult<Option<Criterion>> {
        let row = sqlx::query_as::<_, Criterion>(&format!(
            r#"
            UPDATE kriteria
               SET namakriteria = $2, presentase = $3, updated_at = now()
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(weight)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<CriterionDeletion> {
        let mut tx = self.db.begin().await?;

        // Lock the parent so no sub-criterion can be attached between the check and the delete.
        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM kriteria WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            tx.rollback().await?;
            return Ok(CriterionDeletion::NotFound);
        }

        let has_children: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM subkriteria WHERE id_kriteria = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if has_children {
            tx.rollback().await?;
            return Ok(CriterionDeletion::HasSubCriteria);
        }

        sqlx::query("DELETE FROM kriteria WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(CriterionDeletion::Deleted)
    }
}
