use crate::error::HttpAppError;
use crate::services::FileService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

/// Soft-delete a file: the blob is removed and the record flagged, never
/// dropped. A second delete of the same fileid is a 404.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(fileid): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let service = FileService::new(&state);
    service.delete(&fileid).await?;

    Ok(StatusCode::NO_CONTENT)
}
