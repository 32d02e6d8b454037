use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::validation::FieldError;

static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

/// Attach internal error text to 500 bodies. Set once at startup in development.
pub fn expose_internal_errors(on: bool) {
    EXPOSE_INTERNAL_ERRORS.store(on, Ordering::Relaxed);
}

/// Every failure a handler can return. Rendered as
/// `{success: false, message, errors?, error?}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Upstream {
        message: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let expose = EXPOSE_INTERNAL_ERRORS.load(Ordering::Relaxed);

        let (message, errors, detail) = match &self {
            ApiError::Validation { message, errors } => (message.as_str(), Some(errors.as_slice()), None),
            ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m) => (m.as_str(), None, None),
            ApiError::Upstream { message, source } => {
                error!(error = ?source, "upstream failure");
                (message.as_str(), None, expose.then(|| source.to_string()))
            }
            ApiError::Internal(e) => {
                error!(error = ?e, "internal error");
                ("Internal server error", None, expose.then(|| e.to_string()))
            }
        };

        let body = ErrorBody {
            success: false,
            message,
            errors,
            error: detail,
        };
        (status, Json(body)).into_response()
    }
}
