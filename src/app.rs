use std::any::Any;

use axum::{
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::{auth, criteria, error::ApiError, jobs, state::AppState};

#[derive(Serialize)]
struct Banner {
    message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

async fn root() -> Json<Banner> {
    Json(Banner {
        message: "Profile Matching API Server is running!",
        timestamp: OffsetDateTime::now_utc(),
    })
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".into())
}

fn catch_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "<unknown>".into()
    };
    ApiError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

fn cors(frontend_url: &str) -> CorsLayer {
    let origin = match frontend_url.trim_end_matches('/').parse::<HeaderValue>() {
        Ok(v) => AllowOrigin::list([v]),
        Err(_) => {
            warn!(frontend_url, "FRONTEND_URL is not a valid origin; cross-origin requests disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn build_app(state: AppState) -> Router {
    let cors = cors(&state.config.frontend_url);

    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "ok" }))
        .merge(auth::router())
        .merge(jobs::router())
        .merge(criteria::router())
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(catch_panic))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::auth::claims::Role;
    use crate::test_support::TestApp;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.router().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn root_reports_running() {
        let app = TestApp::new();
        let (status, body) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Profile Matching API Server is running!");
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn health_is_plain_ok() {
        let app = TestApp::new();
        let res = app
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn unknown_route_is_enveloped_404() {
        let app = TestApp::new();
        let (status, body) = send(&app, Request::get("/nope").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "message": "Route not found"}));
    }

    #[tokio::test]
    async fn forbidden_write_leaves_resource_unchanged() {
        let app = TestApp::new();
        let admin = app.token_for(Role::Admin);
        let create = Request::post("/pekerjaan")
            .header(header::AUTHORIZATION, format!("Bearer {admin}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"namapekerjaan": "Guru"}).to_string()))
            .unwrap();
        let (_, body) = send(&app, create).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let user = app.token_for(Role::User);
        let update = Request::put(format!("/pekerjaan/{id}"))
            .header(header::AUTHORIZATION, format!("Bearer {user}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"namapekerjaan": "Dosen"}).to_string()))
            .unwrap();
        let (status, _) = send(&app, update).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let read = Request::get(format!("/pekerjaan/{id}"))
            .header(header::AUTHORIZATION, format!("Bearer {user}"))
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&app, read).await;
        assert_eq!(body["data"]["namapekerjaan"], "Guru");
    }

    #[tokio::test]
    async fn expired_or_garbage_token_is_401() {
        let app = TestApp::new();
        let req = Request::get("/kriteria")
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn cors_allows_only_the_frontend() {
        let app = TestApp::new();
        let preflight = |origin: &str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/pekerjaan")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap()
        };

        let res = app.router().oneshot(preflight("http://localhost:5173")).await.unwrap();
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );

        let res = app.router().oneshot(preflight("http://evil.test")).await.unwrap();
        assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
