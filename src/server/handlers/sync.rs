use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::auth::Principal;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::BlobService;

pub async fn save_blob(
    State(state): State<AppState>,
    principal: Principal,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let created = BlobService::new(state.db.clone())
        .save_bytes(&principal, &body)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(json!({ "message": "Sync data saved successfully" })),
    ))
}

pub async fn load_blob(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse, ApiError> {
    let document = BlobService::new(state.db.clone()).load(&principal).await?;
    Ok(Json(document))
}
