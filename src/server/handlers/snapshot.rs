use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;

use crate::auth::Principal;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::{ExportService, ImportService};

/// Replace the dataset with the snapshot uploaded in the `file` field
pub async fn import_snapshot(
    State(state): State<AppState>,
    principal: Principal,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
            file_bytes = Some(bytes.to_vec());
        }
    }

    let file_bytes = file_bytes.ok_or_else(|| ApiError::bad_request("No file provided"))?;

    info!(
        "Snapshot upload from {} ({} bytes)",
        principal.username,
        file_bytes.len()
    );

    let summary = ImportService::new(state.db.clone())
        .import_bytes(&file_bytes)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Data imported successfully",
            "imported": summary,
        })),
    ))
}

pub async fn export_snapshot(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<impl IntoResponse, ApiError> {
    info!("Snapshot export requested by {}", principal.username);
    let snapshot = ExportService::new(state.db.clone()).export().await?;
    Ok(Json(snapshot))
}
