use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::db::uploads::UploadStore;
use crate::models::{AppState, MessageResponse, UploadResponse, UploadsListResponse};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/uploads", get(list_uploads))
        .route("/uploads/{id}", get(get_upload).delete(delete_upload))
        .with_state(state)
}

/// POST /upload - multipart file upload, extraction and triage
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidRequest(format!("failed to read file field: {e}")))?;
            file = Some((filename, content));
            break;
        }
    }

    let (filename, content) =
        file.ok_or_else(|| AppError::InvalidRequest("missing file field".to_string()))?;
    info!(filename = %filename, "File upload request received");

    let record = state.triage.process(&state.pool, &filename, &content).await?;

    Ok(Json(UploadResponse::from_new_record(record)))
}

/// GET /uploads - all saved uploads, newest first
async fn list_uploads(State(state): State<AppState>) -> AppResult<Json<UploadsListResponse>> {
    let records = UploadStore::list(&state.pool).await?;

    let uploads = records.into_iter().map(UploadResponse::from_record).collect();
    Ok(Json(UploadsListResponse { uploads }))
}

/// GET /uploads/{id} - a single upload by id
async fn get_upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UploadResponse>> {
    let record = UploadStore::get(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Upload não encontrado".to_string()))?;

    Ok(Json(UploadResponse::from_record(record)))
}

/// DELETE /uploads/{id} - permanently remove an upload
async fn delete_upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = UploadStore::delete(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::NotFound("Upload não encontrado".to_string()));
    }

    info!(id = %id, "Upload deleted");
    Ok(Json(MessageResponse {
        message: "Upload excluído com sucesso".to_string(),
    }))
}
