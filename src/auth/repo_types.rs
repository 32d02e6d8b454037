use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::claims::{Role, Subject};

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn subject(&self) -> Subject {
        Subject {
            user_id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Fields needed to insert a user; the hash is computed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
}

/// Password reset row. At most one exists per email.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub expires_at: OffsetDateTime,
    pub used: bool,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
impl PasswordReset {
    pub fn is_redeemable(&self, token: &str, now: OffsetDateTime) -> bool {
        !self.used && self.token == token && self.expires_at > now
    }
}

/// Result of trying to spend a reset token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redemption {
    Redeemed { email: String },
    InvalidOrExpired,
    UserMissing,
}
