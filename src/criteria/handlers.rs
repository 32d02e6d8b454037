use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CriterionList, CriterionRequest},
    repo::Criterion,
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
    not_found: "Kriteria tidak ditemukan",
    has_dependents: "Kriteria tidak dapat dihapus karena masih memiliki subkriteria terkait",
    referenced: "Kriteria tidak dapat dihapus karena masih digunakan di data lain",
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/kriteria", get(list).post(create))
        .route("/kriteria/:id", get(show).put(update).delete(remove))
}

#[instrument(skip(state, _user))]
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<CriterionList>, ApiError> {
    let page = services::list(&state, query.resolve())
        .await
        .map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::ok(
        "Berhasil mendapatkan data kriteria",
        CriterionList {
            kriterias: page.items,
            pagination: page.info,
        },
    ))
}

#[instrument(skip(state, _user))]
pub async fn show(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<Criterion>, ApiError> {
    let row = services::get(&state, id).await.map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::ok("Berhasil mendapatkan detail kriteria", row))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.0.sub))]
pub async fn create(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiJson(payload): ApiJson<CriterionRequest>,
) -> Result<ApiResponse<Criterion>, ApiError> {
    let fields = payload.validate()?;
    let row = services::create(&state, &fields)
        .await
        .map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::created("Kriteria berhasil dibuat", row))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.0.sub))]
pub async fn update(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CriterionRequest>,
) -> Result<ApiResponse<Criterion>, ApiError> {
    let fields = payload.validate()?;
    let row = services::update(&state, id, &fields)
        .await
        .map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::ok("Kriteria berhasil diperbarui", row))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.sub))]
pub async fn remove(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    services::delete(&state, id).await.map_err(|e| e.into_api(&MESSAGES))?;
    Ok(ApiResponse::message("Kriteria berhasil dihapus"))
}

#[cfg(test)]
mod tests {
    use crate::auth::claims::Role;
    use crate::test_support::TestApp;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.router().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn authed(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_accepts_string_weight() {
        let app = TestApp::new();
        let admin = app.token_for(Role::Admin);
        let (status, body) = send(
            &app,
            authed("POST", "/kriteria", &admin, Some(json!({"namakriteria": "Pendidikan", "presentase": "35"}))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["presentase"], 35.0);
        assert_eq!(body["data"]["namakriteria"], "Pendidikan");
    }

    #[tokio::test]
    async fn weight_over_100_is_rejected() {
        let app = TestApp::new();
        let admin = app.token_for(Role::Admin);
        let (status, body) = send(
            &app,
            authed("POST", "/kriteria", &admin, Some(json!({"namakriteria": "Pendidikan", "presentase": 101}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "presentase");
    }

    #[tokio::test]
    async fn malformed_uuid_is_400() {
        let app = TestApp::new();
        let user = app.token_for(Role::User);
        let (status, _) = send(&app, authed("GET", "/kriteria/not-a-uuid", &user, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_with_sub_criteria_keeps_rows() {
        let app = TestApp::new();
        let admin = app.token_for(Role::Admin);
        let (_, body) = send(
            &app,
            authed("POST", "/kriteria", &admin, Some(json!({"namakriteria": "Pengalaman", "presentase": 25}))),
        )
        .await;
        let id: uuid::Uuid = body["data"]["id"].as_str().unwrap().parse().unwrap();
        app.criteria.add_sub_criterion(id);

        let (status, body) = send(&app, authed("DELETE", &format!("/kriteria/{id}"), &admin, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Kriteria tidak dapat dihapus karena masih memiliki subkriteria terkait"
        );

        let (status, _) = send(&app, authed("GET", &format!("/kriteria/{id}"), &admin, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.criteria.sub_criteria_of(id), 1);
    }

    #[tokio::test]
    async fn user_cannot_delete() {
        let app = TestApp::new();
        let admin = app.token_for(Role::Admin);
        let (_, body) = send(
            &app,
            authed("POST", "/kriteria", &admin, Some(json!({"namakriteria": "Kesehatan", "presentase": 5}))),
        )
        .await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let user = app.token_for(Role::User);
        let (status, _) = send(&app, authed("DELETE", &format!("/kriteria/{id}"), &user, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, authed("GET", &format!("/kriteria/{id}"), &user, None)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
