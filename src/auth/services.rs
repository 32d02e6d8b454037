use rand::{rngs::OsRng, RngCore};
use time::{Duration, OffsetDateTime};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    dto::AuthResponse,
    password::{hash_password_blocking, verify_password_blocking},
    repo_types::{NewUser, Redemption, User},
};
use crate::{
    db::DbError,
    error::ApiError,
    mailer::Email,
    response::{Page, PageInfo, PageRequest},
    state::AppState,
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error("current password is incorrect")]
    InvalidOldPassword,
    #[error("invalid or expired reset token")]
    InvalidOrExpiredToken,
    #[error("failed to send email")]
    EmailSendFailed(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DbError> for AuthError {
    fn from(e: DbError) -> Self {
        AuthError::Internal(e.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UserExists => ApiError::BadRequest("User with this email already exists".into()),
            AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid email or password".into()),
            AuthError::UserNotFound => ApiError::NotFound("User not found".into()),
            AuthError::InvalidOldPassword => ApiError::BadRequest("Current password is incorrect".into()),
            AuthError::InvalidOrExpiredToken => {
                ApiError::BadRequest("Invalid or expired reset token".into())
            }
            AuthError::EmailSendFailed(source) => ApiError::Upstream {
                message: "Failed to send reset email. Please try again later.".into(),
                source,
            },
            AuthError::Internal(e) => ApiError::Internal(e),
        }
    }
}

pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// What `create_password_reset` hands back to its caller.
#[derive(Debug, Clone)]
pub struct ResetTicket {
    pub reset_token: String,
    pub email: String,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgetOutcome {
    Sent,
    UnknownEmail,
}

fn issue(state: &AppState, user: User) -> Result<AuthResponse, AuthError> {
    let token = state.keys.sign(&user.subject())?;
    Ok(AuthResponse { user, token })
}

/// 32 random bytes, hex encoded.
fn reset_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub async fn register(state: &AppState, input: Registration) -> Result<AuthResponse, AuthError> {
    if state.users.find_by_email(&input.email).await?.is_some() {
        warn!(email = %input.email, "email already registered");
        return Err(AuthError::UserExists);
    }

    let password_hash = hash_password_blocking(&input.password).await?;
    let user = state
        .users
        .create(NewUser {
            name: input.name.trim().to_string(),
            email: input.email,
            phone: input.phone.trim().to_string(),
            password_hash,
            role: state.config.default_role,
        })
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation => AuthError::UserExists,
            other => other.into(),
        })?;

    info!(user_id = %user.id, email = %user.email, role = %user.role, "user registered");
    issue(state, user)
}

pub async fn login(state: &AppState, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
    let Some(user) = state.users.find_by_email(email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password_blocking(password, &user.password_hash).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user logged in");
    issue(state, user)
}

pub async fn profile(state: &AppState, user_id: Uuid) -> Result<User, AuthError> {
    state.users.find_by_id(user_id).await?.ok_or(AuthError::UserNotFound)
}

pub async fn update_profile(
    state: &AppState,
    user_id: Uuid,
    name: &str,
    phone: &str,
) -> Result<User, AuthError> {
    let user = state
        .users
        .update_profile(user_id, name.trim(), phone.trim())
        .await?
        .ok_or(AuthError::UserNotFound)?;
    info!(user_id = %user.id, "profile updated");
    Ok(user)
}

/// Existing tokens stay valid until they expire.
pub async fn change_password(
    state: &AppState,
    user_id: Uuid,
    current: &str,
    new: &str,
) -> Result<(), AuthError> {
    let user = state.users.find_by_id(user_id).await?.ok_or(AuthError::UserNotFound)?;

    if !verify_password_blocking(current, &user.password_hash).await? {
        warn!(user_id = %user_id, "change password with wrong current password");
        return Err(AuthError::InvalidOldPassword);
    }

    let hash = hash_password_blocking(new).await?;
    if !state.users.update_password(user_id, &hash).await? {
        return Err(AuthError::UserNotFound);
    }
    info!(user_id = %user_id, "password changed");
    Ok(())
}

pub async fn create_password_reset(state: &AppState, email: &str) -> Result<ResetTicket, AuthError> {
    let user = state.users.find_by_email(email).await?.ok_or(AuthError::UserNotFound)?;

    let token = reset_token();
    let expires_at = OffsetDateTime::now_utc() + Duration::minutes(state.config.reset_ttl_minutes);
    let reset = state.users.replace_reset(&user.email, &token, expires_at).await?;

    debug_assert!(!reset.used, "freshly issued reset is already spent");
    info!(
        reset_id = %reset.id,
        email = %reset.email,
        issued_at = %reset.created_at,
        expires_at = %reset.expires_at,
        "password reset issued"
    );
    Ok(ResetTicket {
        reset_token: reset.token,
        email: reset.email,
        expires_at: reset.expires_at,
    })
}

pub async fn send_password_reset_email(
    state: &AppState,
    email: &str,
    token: &str,
) -> Result<(), AuthError> {
    let link = format!(
        "{}/reset-password?token={}",
        state.config.frontend_url.trim_end_matches('/'),
        token
    );
    let message = Email::password_reset(&state.config.mail_from, email, &link);

    state.mailer.send(message).await.map_err(|e| {
        error!(error = ?e, email = %email, "reset email failed");
        AuthError::EmailSendFailed(e)
    })
}

/// Issues a reset and mails it. An unknown email is not an error so callers
/// can answer identically either way.
pub async fn forget_password(state: &AppState, email: &str) -> Result<ForgetOutcome, AuthError> {
    let ticket = match create_password_reset(state, email).await {
        Ok(t) => t,
        Err(AuthError::UserNotFound) => {
            info!(email = %email, "reset requested for unknown email");
            return Ok(ForgetOutcome::UnknownEmail);
        }
        Err(e) => return Err(e),
    };
    send_password_reset_email(state, &ticket.email, &ticket.reset_token).await?;
    Ok(ForgetOutcome::Sent)
}

pub async fn reset_password(state: &AppState, token: &str, new: &str) -> Result<(), AuthError> {
    let hash = hash_password_blocking(new).await?;
    match state.users.redeem_reset(token, &hash, OffsetDateTime::now_utc()).await? {
        Redemption::Redeemed { email } => {
            info!(email = %email, "password reset redeemed");
            Ok(())
        }
        Redemption::InvalidOrExpired => {
            warn!("reset token invalid or expired");
            Err(AuthError::InvalidOrExpiredToken)
        }
        Redemption::UserMissing => {
            warn!("reset token for a deleted user");
            Err(AuthError::UserNotFound)
        }
    }
}

pub async fn list_users(state: &AppState, req: PageRequest) -> Result<Page<User>, AuthError> {
    let (items, total) = state.users.list(req.limit, req.offset()).await?;
    Ok(Page {
        items,
        info: PageInfo::new(req, total),
    })
}
