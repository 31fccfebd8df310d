//! File service: the business logic between the HTTP handlers and the
//! metadata store / blob storage.
//!
//! Upload workflow: validate mime → resolve a collision-free fileid →
//! stream the bytes to storage while hashing → insert the metadata row.
//! The blob write deliberately completes before the row insert; if the
//! insert then fails, the fresh blob is deleted so it does not linger as
//! an orphan. A crash between the two steps can still leave one (accepted).

use std::sync::Arc;

use axum::extract::multipart::Field;
use chrono::{DateTime, Utc};
use vidstore_core::models::{FileRecord, NewFileRecord};
use vidstore_core::{AppError, UploadPolicy};
use vidstore_db::{FileRepository, Pagination};
use vidstore_storage::{BlobStorage, BlobStream, StorageError};

use crate::state::AppState;

pub struct FileService {
    repository: FileRepository,
    storage: Arc<BlobStorage>,
    policy: UploadPolicy,
}

impl FileService {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            storage: state.storage.clone(),
            policy: state.upload_policy.clone(),
        }
    }

    /// Non-deleted records in insertion order; offset/limit only when the
    /// requested limit is positive.
    pub async fn list(&self, pagination: Pagination) -> Result<Vec<FileRecord>, AppError> {
        self.repository.list(pagination).await
    }

    /// Store one uploaded multipart field and record its metadata.
    pub async fn upload(&self, field: Field<'_>) -> Result<FileRecord, AppError> {
        let declared_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let declared_mime = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !self.policy.allows_mime(&declared_mime) {
            return Err(AppError::UnsupportedMediaType(format!(
                "Content type '{}' is not allowed",
                declared_mime
            )));
        }

        let fileid = self.resolve_fileid(&declared_name).await?;
        let storage_name = storage_name(&fileid, Utc::now());

        // Field is consumed chunk by chunk; it is released when this stream
        // is dropped, whether the write succeeds or fails.
        let stream = Box::pin(futures::stream::try_unfold(field, |mut field| async move {
            match field.chunk().await {
                Ok(Some(chunk)) => Ok(Some((chunk, field))),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            }
        }));

        let blob = self
            .storage
            .write_stream(&storage_name, stream, self.policy.size_limit())
            .await
            .map_err(|e| match e {
                StorageError::LimitExceeded { limit } => AppError::PayloadTooLarge(format!(
                    "Upload exceeds maximum allowed size of {} bytes",
                    limit
                )),
                StorageError::InvalidName(msg) => AppError::BadRequest(msg),
                other => AppError::Storage(other.to_string()),
            })?;

        tracing::info!(
            fileid = %fileid,
            path = %storage_name,
            size_bytes = blob.size,
            "Upload stored"
        );

        let record = NewFileRecord {
            fileid,
            path: storage_name.clone(),
            name: declared_name,
            size: blob.size as i64,
            checksum: blob.checksum,
            mime: declared_mime,
            created_at: Utc::now(),
        };

        match self.repository.insert(record).await {
            Ok(row) => Ok(row),
            Err(e) => {
                // The blob is already on disk; remove it so a failed insert
                // does not leave an orphan.
                if let Err(cleanup_err) = self.storage.delete(&storage_name).await {
                    tracing::warn!(
                        error = %cleanup_err,
                        path = %storage_name,
                        "Failed to clean up blob after insert error"
                    );
                }
                Err(e)
            }
        }
    }

    /// Look up a non-deleted record and open its blob for streaming.
    pub async fn download(
        &self,
        fileid: &str,
    ) -> Result<(FileRecord, BlobStream), AppError> {
        let record = self
            .repository
            .find_by_fileid(fileid)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let stream = self
            .storage
            .read_stream(&record.path)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) => AppError::NotFound("File not found".to_string()),
                other => AppError::Storage(other.to_string()),
            })?;

        Ok((record, stream))
    }

    /// Remove the blob, then flip the soft-delete flag. There is no rollback
    /// if the flip fails after the blob is gone (accepted weakness).
    pub async fn delete(&self, fileid: &str) -> Result<(), AppError> {
        let record = self
            .repository
            .find_by_fileid(fileid)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        self.storage
            .delete(&record.path)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let flipped = self.repository.mark_deleted(record.id).await?;
        if !flipped {
            // The row was flipped concurrently between lookup and update.
            return Err(AppError::NotFound("File not found".to_string()));
        }

        tracing::info!(fileid = %fileid, path = %record.path, "File deleted");
        Ok(())
    }

    /// Resolve a fileid that is unused among non-deleted records: the
    /// declared name if free, otherwise `stem_1.ext`, `stem_2.ext`, ... -
    /// a strictly sequential probe.
    async fn resolve_fileid(&self, declared_name: &str) -> Result<String, AppError> {
        if self
            .repository
            .find_by_fileid(declared_name)
            .await?
            .is_none()
        {
            return Ok(declared_name.to_string());
        }

        let (stem, ext) = split_filename(declared_name);
        let mut count = 1u32;
        loop {
            let candidate = format!("{}_{}{}", stem, count, ext);
            if self.repository.find_by_fileid(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            count += 1;
        }
    }
}

/// Split a filename into stem and extension, the extension keeping its dot.
/// A leading dot is part of the stem, not an extension separator.
fn split_filename(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// On-disk storage filename: `{UTC timestamp to seconds}_{fileid}`,
/// collision-free by construction.
fn storage_name(fileid: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}", at.format("%Y%m%d_%H%M%S"), fileid)
}
