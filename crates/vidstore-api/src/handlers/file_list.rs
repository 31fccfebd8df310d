use crate::error::HttpAppError;
use crate::services::FileService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use vidstore_core::models::FileSummary;
use vidstore_db::Pagination;

/// Query parameters for listing: both default to 0, and a non-positive
/// limit means unlimited.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default)]
    limit: i64,
}

pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let service = FileService::new(&state);

    let records = service
        .list(Pagination {
            skip: query.skip,
            limit: query.limit,
        })
        .await?;

    let summaries: Vec<FileSummary> = records.into_iter().map(FileSummary::from).collect();
    Ok(Json(summaries))
}
