use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::errors::{AuthError, BlobError, SnapshotError};

/// Error returned by every handler.
///
/// Renders as `{"error": CODE, "message": ..., ...context}`. Server-side
/// failures return a generic message; the detail only goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Request did not have the expected shape (e.g. no upload field)
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Snapshot(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Snapshot(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Blob(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Blob(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(e) if e.is_authentication_error() => StatusCode::UNAUTHORIZED,
            ApiError::Auth(e) if e.is_conflict() => StatusCode::CONFLICT,
            ApiError::Auth(e) if e.is_validation_error() => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Snapshot(e) => e.error_code(),
            ApiError::Blob(e) => e.error_code(),
            ApiError::Auth(e) => e.error_code(),
            ApiError::BadRequest(_) => "BAD_REQUEST",
        }
    }

    fn context(&self) -> Map<String, Value> {
        let mut context = Map::new();
        match self {
            ApiError::Snapshot(SnapshotError::DuplicateId { kind, id }) => {
                context.insert("kind".to_string(), json!(kind));
                context.insert("id".to_string(), json!(id));
            }
            ApiError::Snapshot(SnapshotError::DanglingFarmReference {
                kind,
                record_id,
                farm_id,
            }) => {
                context.insert("kind".to_string(), json!(kind));
                context.insert("recordId".to_string(), json!(record_id));
                context.insert("farmId".to_string(), json!(farm_id));
            }
            ApiError::Snapshot(SnapshotError::Persistence { step, .. }) => {
                context.insert("step".to_string(), json!(step));
            }
            _ => {}
        }
        context
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
            self.to_string()
        };

        let mut body = self.context();
        body.insert("error".to_string(), json!(self.error_code()));
        body.insert("message".to_string(), json!(message));

        let mut response = (status, Json(Value::Object(body))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
        }
        response
    }
}
