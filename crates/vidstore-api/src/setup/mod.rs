//! Application initialization: database, storage, routes.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use vidstore_core::Config;
use vidstore_storage::BlobStorage;

use crate::state::AppState;

/// Initialize the application: connect the database, prepare blob storage,
/// and build the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let pool = database::setup_database(&config).await?;

    let storage = BlobStorage::new(config.storage_dir.clone(), config.upload_chunk_size)
        .await
        .context("Failed to initialize blob storage")?;

    let state = Arc::new(AppState::new(
        pool,
        Arc::new(storage),
        config.upload_policy(),
    ));
    let router = routes::build_router(state.clone());

    Ok((state, router))
}
