use axum::{
    extract::{Query, State},
    routing::{get, post, put},
    Router,
};
use tracing::{debug, instrument};

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, ForgetPasswordRequest, LoginRequest,
            RegisterRequest, ResetPasswordRequest, UpdateProfileRequest, UserEnvelope, UserList,
        },
        extractors::{AdminUser, AuthUser},
        services::{self, Registration},
    },
    error::ApiError,
    extract::ApiJson,
    response::{ApiResponse, PageQuery},
    state::AppState,
    validation::normalize_email,
};

const FORGET_PASSWORD_REPLY: &str = "If the email exists, a password reset link has been sent";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/forget-password", post(forget_password))
        .route("/auth/reset-password", post(reset_password))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route("/auth/change-password", put(change_password))
        .route("/auth/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<RegisterRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);
    payload.validate()?;

    let out = services::register(
        &state,
        Registration {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
        },
    )
    .await?;
    Ok(ApiResponse::created("User registered successfully", out))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);
    payload.validate()?;

    let out = services::login(&state, &payload.email, &payload.password).await?;
    Ok(ApiResponse::ok("Login successful", out))
}

#[instrument(skip(state, claims), fields(user_id = %claims.sub))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<ApiResponse<UserEnvelope>, ApiError> {
    let user = services::profile(&state, claims.sub).await?;
    Ok(ApiResponse::ok("Profile retrieved successfully", UserEnvelope { user }))
}

#[instrument(skip(state, claims, payload), fields(user_id = %claims.sub))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<ApiResponse<UserEnvelope>, ApiError> {
    payload.validate()?;
    let user = services::update_profile(&state, claims.sub, &payload.name, &payload.phone).await?;
    Ok(ApiResponse::ok("Profile updated successfully", UserEnvelope { user }))
}

#[instrument(skip(state, claims, payload), fields(user_id = %claims.sub))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    payload.validate()?;
    services::change_password(
        &state,
        claims.sub,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    Ok(ApiResponse::message("Password changed successfully"))
}

#[instrument(skip(state, payload))]
pub async fn forget_password(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<ForgetPasswordRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    payload.email = normalize_email(&payload.email);
    payload.validate()?;

    // one reply for known and unknown addresses
    let outcome = services::forget_password(&state, &payload.email).await?;
    debug!(?outcome, "forget-password handled");
    Ok(ApiResponse::message(FORGET_PASSWORD_REPLY))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    payload.validate()?;
    services::reset_password(&state, payload.token.trim(), &payload.new_password).await?;
    Ok(ApiResponse::message("Password reset successfully"))
}

#[instrument(skip(state, _admin))]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<UserList>, ApiError> {
    let page = services::list_users(&state, query.resolve()).await?;
    Ok(ApiResponse::ok(
        "Users retrieved successfully",
        UserList {
            users: page.items,
            pagination: page.info,
        },
    ))
}
