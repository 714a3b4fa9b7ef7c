//! JSON envelopes shared by every endpoint.
//!
//! Success: `{success: true, data, meta?}`. Failure: `{success: false, message}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
}

/// Pagination metadata of a list response.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListMeta {
    /// Matches before pagination.
    pub count: u64,
    pub limit: u32,
    pub offset: u32,
}

pub fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
        meta: None,
    })
}

pub fn success_with_meta<T: Serialize>(data: T, meta: ListMeta) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
        meta: Some(meta),
    })
}

#[derive(Debug, Serialize)]
struct FailureBody {
    success: bool,
    message: String,
}

/// Failure envelope with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", resource))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(FailureBody {
                success: false,
                message: self.message,
            }),
        )
            .into_response()
    }
}
