use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use super::{
    claims::{Claims, Role},
    jwt::{JwtKeys, TokenError},
};
use crate::error::ApiError;

/// Why a request was turned away before reaching its handler.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("missing Authorization header")]
    MissingToken,
    #[error("Authorization header is not a bearer token")]
    InvalidScheme,
    #[error("invalid token")]
    InvalidToken,
    #[error("expired token")]
    ExpiredToken,
    #[error("role {required} required")]
    Forbidden { required: Role },
}

impl From<TokenError> for GuardError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid => GuardError::InvalidToken,
            TokenError::Expired => GuardError::ExpiredToken,
        }
    }
}

impl From<GuardError> for ApiError {
    fn from(e: GuardError) -> Self {
        match e {
            GuardError::MissingToken => ApiError::Unauthorized("Access denied. No token provided.".into()),
            GuardError::InvalidScheme => ApiError::Unauthorized("Invalid authorization header".into()),
            GuardError::InvalidToken => ApiError::Unauthorized("Invalid token".into()),
            GuardError::ExpiredToken => ApiError::Unauthorized("Token expired".into()),
            GuardError::Forbidden { .. } => {
                ApiError::Forbidden("Access denied. Insufficient permissions.".into())
            }
        }
    }
}

/// Runs the header through `NoToken -> TokenPresent -> Authenticated -> Authorized`.
/// Identity and role come from the token alone.
pub fn authorize(
    header: Option<&str>,
    keys: &JwtKeys,
    required: Option<Role>,
) -> Result<Claims, GuardError> {
    let header = header.ok_or(GuardError::MissingToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(GuardError::InvalidScheme)?;

    let claims = keys.verify(token).map_err(|e| {
        match e {
            TokenError::Expired => debug!("bearer token expired"),
            TokenError::Invalid => warn!("bearer token rejected"),
        }
        GuardError::from(e)
    })?;

    if let Some(role) = required {
        if claims.role != role {
            warn!(user_id = %claims.sub, role = %claims.role, required = %role, "forbidden");
            return Err(GuardError::Forbidden { required: role });
        }
    }

    Ok(claims)
}

fn bearer_header(parts: &Parts) -> Option<&str> {
    parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Any authenticated caller.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let claims = authorize(bearer_header(parts), &keys, None)?;
        Ok(AuthUser(claims))
    }
}

/// An authenticated caller holding the admin role.
pub struct AdminUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let claims = authorize(bearer_header(parts), &keys, Some(Role::Admin))?;
        Ok(AdminUser(claims))
    }
}
