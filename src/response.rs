use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;
// Keeps `offset()` inside i64 for any accepted page.
const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Success envelope: `{success: true, message, data?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, Some(data))
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, Some(data))
    }

    fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status,
            body: Envelope {
                success: true,
                message: message.into(),
                data,
            },
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Raw `?page=&limit=` query. Anything unparseable or non-positive falls back
/// to the defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageQuery {
    pub fn resolve(&self) -> PageRequest {
        let pick = |raw: &Option<String>, default: i64| {
            raw.as_deref()
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        PageRequest {
            page: pick(&self.page, DEFAULT_PAGE).min(MAX_PAGE),
            limit: pick(&self.limit, DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }
}

impl PageRequest {
    #[cfg(test)]
    pub fn new(page: i64, limit: i64) -> Self {
        PageQuery {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
        }
        .resolve()
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(req: PageRequest, total: i64) -> Self {
        Self {
            page: req.page,
            limit: req.limit,
            total,
            total_pages: (total + req.limit - 1) / req.limit,
        }
    }
}

/// One page of rows plus its pagination info.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}
