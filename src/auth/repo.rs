use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, PasswordReset, Redemption, User};
use crate::db::DbResult;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>>;
    async fn create(&self, user: NewUser) -> DbResult<User>;
    async fn update_profile(&self, id: Uuid, name: &str, phone: &str) -> DbResult<Option<User>>;
    /// Returns false when no user has this id.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> DbResult<bool>;
    /// Newest first, plus the total row count.
    async fn list(&self, limit: i64, offset: i64) -> DbResult<(Vec<User>, i64)>;
    /// Drops every earlier reset for the email, then stores the new one.
    async fn replace_reset(
        &self,
        email: &str,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> DbResult<PasswordReset>;
    /// Marks the reset used and swaps the password hash as one unit.
    async fn redeem_reset(
        &self,
        token: &str,
        password_hash: &str,
        now: OffsetDateTime,
    ) -> DbResult<Redemption>;
}

const USER_COLUMNS: &str =
    "id, name, email, phone, password_hash, role, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> DbResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn update_profile(&self, id: Uuid, name: &str, phone: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = $2, phone = $3, updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(phone)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> DbResult<bool> {
        let res = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn list(&self, limit: i64, offset: i64) -> DbResult<(Vec<User>, i64)> {
        let mut tx = self.db.begin().await?;
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
              FROM users
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok((users, total))
    }

    async fn replace_reset(
        &self,
        email: &str,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> DbResult<PasswordReset> {
        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM password_resets WHERE email = $1")
            .bind(email)
            .execute(&mut *tx)
            .await?;
        let reset = sqlx::query_as::<_, PasswordReset>(
            r#"
            INSERT INTO password_resets (id, email, token, expires_at, used)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING id, email, token, expires_at, used, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(reset)
    }

    async fn redeem_reset(
        &self,
        token: &str,
        password_hash: &str,
        now: OffsetDateTime,
    ) -> DbResult<Redemption> {
        let mut tx = self.db.begin().await?;

        // The conditional update takes the row lock; a concurrent redeemer
        // re-evaluates the predicate after we commit and finds used = TRUE.
        let email: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE password_resets
               SET used = TRUE
             WHERE token = $1 AND used = FALSE AND expires_at > $2
            RETURNING email
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(email) = email else {
            tx.rollback().await?;
            return Ok(Redemption::InvalidOrExpired);
        };

        let res = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = now() WHERE email = $1",
        )
        .bind(&email)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

        if res.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(Redemption::UserMissing);
        }

        tx.commit().await?;
        Ok(Redemption::Redeemed { email })
    }
}
