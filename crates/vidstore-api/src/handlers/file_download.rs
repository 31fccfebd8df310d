use crate::error::HttpAppError;
use crate::services::FileService;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use vidstore_core::AppError;

/// Stream a stored blob back under its original filename and mime type.
/// The storage path never leaks to the client.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(fileid): Path<String>,
) -> Result<Response, HttpAppError> {
    let service = FileService::new(&state);
    let (record, stream) = service.download(&fileid).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, record.mime.as_str())
        .header(header::CONTENT_LENGTH, record.size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", record.name),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {}", e)))?;

    Ok(response)
}
