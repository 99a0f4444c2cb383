//! Conversion request lifecycle: receive upload → stage → transcode →
//! publish → report, with the workspace released on every path.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use utoipa::ToSchema;
use uuid::Uuid;
use vodworks_core::constants::DEFAULT_BLOB_PREFIX;
use vodworks_core::AppError;
use vodworks_processing::Workspace;

#[derive(Serialize, ToSchema)]
pub struct ConvertResponse {
    pub success: bool,
    /// Public URL of the master playlist
    pub master_url: String,
    pub files_uploaded: usize,
}

/// Convert an uploaded video to two-variant HLS and publish it to the
/// remote store.
#[utoipa::path(
    post,
    path = "/convert",
    tag = "convert",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Conversion succeeded", body = ConvertResponse),
        (status = 400, description = "Missing or unnamed video upload", body = ErrorResponse),
        (status = 500, description = "Staging, transcode, or publish failure", body = ErrorResponse)
    )
)]
pub async fn convert_video(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ConvertResponse>, HttpAppError> {
    let request_id = Uuid::new_v4();
    tracing::info!(request_id = %request_id, "Received conversion request");

    // Walk the form fields. The workspace is only acquired once a valid
    // video part shows up, so rejected requests never touch the filesystem.
    let mut staged: Option<Workspace> = None;
    let mut blob_path: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    return Err(AppError::BadRequest("Empty filename".to_string()).into());
                }

                let workspace = Workspace::create()
                    .await
                    .map_err(|e| AppError::Internal(format!("Workspace creation failed: {e:#}")))?;

                let size = stage_upload(&workspace, field).await?;
                tracing::info!(
                    request_id = %request_id,
                    filename = %filename,
                    size_bytes = size,
                    "Video staged"
                );
                staged = Some(workspace);
            }
            "blob_path" => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Malformed multipart request: {}", e))
                })?;
                blob_path = Some(value);
            }
            _ => {}
        }
    }

    let Some(workspace) = staged else {
        return Err(AppError::BadRequest("No video file uploaded".to_string()).into());
    };

    let prefix = blob_path
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BLOB_PREFIX.to_string());

    // The workspace is dropped (and its tree removed) on the error path;
    // the success path closes it explicitly to surface removal failures.
    let result = state.pipeline.run(&workspace, &prefix).await?;

    if let Err(e) = workspace.close() {
        tracing::warn!(request_id = %request_id, error = %e, "Workspace cleanup failed");
    }

    tracing::info!(
        request_id = %request_id,
        master_url = %result.master_url,
        files_uploaded = result.files.len(),
        "Conversion complete"
    );

    Ok(Json(ConvertResponse {
        success: true,
        master_url: result.master_url,
        files_uploaded: result.files.len(),
    }))
}

/// Stream the upload chunk-by-chunk into the workspace input slot.
async fn stage_upload(workspace: &Workspace, mut field: Field<'_>) -> Result<u64, HttpAppError> {
    let mut file = tokio::fs::File::create(workspace.input_path())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create input file: {}", e)))?;

    let mut written: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(format!("Upload interrupted: {}", e)))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write input file: {}", e)))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to flush input file: {}", e)))?;

    Ok(written)
}
