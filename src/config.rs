use anyhow::Context;
use serde::Deserialize;

use crate::auth::claims::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    /// `development` exposes internal error text in 500 responses.
    pub environment: String,
    pub frontend_url: String,
    pub default_role: Role,
    pub reset_ttl_minutes: i64,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let secret = required("JWT_SECRET")?;
        anyhow::ensure!(!secret.trim().is_empty(), "JWT_SECRET must not be empty");

        let jwt = JwtConfig {
            secret,
            issuer: or("JWT_ISSUER", "profile-matching"),
            audience: or("JWT_AUDIENCE", "profile-matching-users"),
            ttl_minutes: parse(&lookup, "JWT_TTL_MINUTES", 60 * 24)?,
        };

        let database = DatabaseConfig {
            url: required("DATABASE_URL")?,
            max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            acquire_timeout_secs: parse(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
        };

        let default_role = match lookup("DEFAULT_USER_ROLE") {
            Some(v) => v
                .parse::<Role>()
                .map_err(|_| anyhow::anyhow!("DEFAULT_USER_ROLE must be `admin` or `user`, got `{v}`"))?,
            None => Role::User,
        };

        Ok(Self {
            database,
            jwt,
            host: or("APP_HOST", "0.0.0.0"),
            port: parse(&lookup, "APP_PORT", 8080)?,
            environment: or("APP_ENV", "production"),
            frontend_url: or("FRONTEND_URL", "http://localhost:5173"),
            default_role,
            reset_ttl_minutes: parse(&lookup, "RESET_TOKEN_TTL_MINUTES", 60)?,
            mail_from: or("MAIL_FROM", "no-reply@localhost"),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {key} `{raw}`: {e}")),
        None => Ok(default),
    }
}
