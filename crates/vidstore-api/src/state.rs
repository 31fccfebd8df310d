//! Application state shared by all handlers.

use std::sync::Arc;

use sqlx::PgPool;
use vidstore_core::UploadPolicy;
use vidstore_db::FileRepository;
use vidstore_storage::BlobStorage;

#[derive(Clone)]
pub struct AppState {
    pub repository: FileRepository,
    pub storage: Arc<BlobStorage>,
    pub upload_policy: UploadPolicy,
}

impl AppState {
    pub fn new(pool: PgPool, storage: Arc<BlobStorage>, upload_policy: UploadPolicy) -> Self {
        Self {
            repository: FileRepository::new(pool),
            storage,
            upload_policy,
        }
    }
}
