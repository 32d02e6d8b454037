use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use tracing::instrument;

use super::{
    dto::{JobList, JobRequest},
    repo::Job,
    services,
};
use crate::{
    auth::extractors::{AdminUser, AuthUser},
    error::ApiError,
    extract::{ApiJson, ApiPath},
    resource::Messages,
    response::{ApiResponse, PageQuery},
    state::AppState,
};

const MESSAGES: Messages = Messages {
    not_found: "Pekerjaan tidak ditemukan",
    has_dependents: "Pekerjaan tidak dapat dihapus karena masih digunakan di data lain",
    referenced: "Pekerjaan tidak dapat dihapus karena masih digunakan di data lain",
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pekerjaan", get(list).post(create))
        .route("/pekerjaan/:id", get(show).put(update).delete(remove))
}

#[instrument(skip(state, _user))]
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<JobList>, ApiError> {
    let page = services::list(&state, query.resolve())
        .await
        .map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::ok(
        "Berhasil mendapatkan data pekerjaan",
        JobList {
            pekerjaans: page.items,
            pagination: page.info,
        },
    ))
}

#[instrument(skip(state, _user))]
pub async fn show(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<Job>, ApiError> {
    let job = services::get(&state, id).await.map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::ok("Berhasil mendapatkan detail pekerjaan", job))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.0.sub))]
pub async fn create(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiJson(payload): ApiJson<JobRequest>,
) -> Result<ApiResponse<Job>, ApiError> {
    let name = payload.validate()?;
    let job = services::create(&state, &name).await.map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::created("Pekerjaan berhasil dibuat", job))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.0.sub))]
pub async fn update(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<JobRequest>,
) -> Result<ApiResponse<Job>, ApiError> {
    let name = payload.validate()?;
    let job = services::update(&state, id, &name)
        .await
        .map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::ok("Pekerjaan berhasil diperbarui", job))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.sub))]
pub async fn remove(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<ApiResponse<()>, ApiError> {
    services::delete(&state, id).await.map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::message("Pekerjaan berhasil dihapus"))
}
