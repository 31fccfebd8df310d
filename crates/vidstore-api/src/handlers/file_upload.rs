use crate::error::HttpAppError;
use crate::services::FileService;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use vidstore_core::models::UploadResponse;
use vidstore_core::AppError;

/// Accept a multipart upload: the first field named `file` is stored and
/// recorded; a request without one is a 400.
///
/// On success: 201 with `Location: /files/{fileid}` and a JSON echo of the
/// created record.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let service = FileService::new(&state);

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart request: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let record = service.upload(field).await?;

        tracing::info!(fileid = %record.fileid, size = record.size, "File uploaded");

        let location = format!("/files/{}", record.fileid);
        return Ok((
            StatusCode::CREATED,
            [(header::LOCATION, location)],
            Json(UploadResponse::from(record)),
        )
            .into_response());
    }

    Err(HttpAppError::from(AppError::BadRequest(
        "No file provided".to_string(),
    )))
}
