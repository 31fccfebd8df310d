use std::fmt::Display;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::io::ReaderStream;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid storage name: {0}")]
    InvalidName(String),

    #[error("Upload exceeds size limit of {limit} bytes")]
    LimitExceeded { limit: u64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked byte stream over a stored blob, suitable as an HTTP response body.
pub type BlobStream = ReaderStream<fs::File>;

/// Outcome of a streamed write: byte count and hex-encoded SHA-256 digest.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub size: u64,
    pub checksum: String,
}

/// Local filesystem blob storage: one flat directory, no subdirectories.
#[derive(Clone)]
pub struct BlobStorage {
    base_path: PathBuf,
    chunk_size: usize,
}

impl BlobStorage {
    /// Create a new BlobStorage rooted at `base_path`, creating the directory
    /// if it does not exist. `chunk_size` sizes the buffered writer and the
    /// read stream chunks.
    pub async fn new(base_path: impl Into<PathBuf>, chunk_size: usize) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(BlobStorage {
            base_path,
            chunk_size,
        })
    }

    /// Convert a storage name to a filesystem path.
    ///
    /// Names are single path components; anything containing a separator or
    /// a parent-directory reference is rejected before touching the
    /// filesystem.
    fn name_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StorageError::InvalidName(
                "Storage name contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(name))
    }

    /// Remove a partially written blob after a failed write. Best-effort.
    async fn cleanup_partial(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            tracing::debug!(
                path = %path.display(),
                error = %e,
                "Failed to remove partial blob"
            );
        }
    }

    /// Stream `stream` to the blob named `name`, hashing as it goes.
    ///
    /// When `max_size` is set, the write aborts with `LimitExceeded` as soon
    /// as the running byte count passes it. On any failure the partial file
    /// is removed before the error is returned.
    pub async fn write_stream<S, E>(
        &self,
        name: &str,
        mut stream: S,
        max_size: Option<u64>,
    ) -> StorageResult<StoredBlob>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Display,
    {
        let path = self.name_to_path(name)?;
        let start = std::time::Instant::now();

        let file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);

        let mut hasher = Sha256::new();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.cleanup_partial(&path).await;
                    return Err(StorageError::WriteFailed(format!(
                        "Failed to read upload stream: {}",
                        e
                    )));
                }
            };

            written += chunk.len() as u64;
            if let Some(limit) = max_size {
                if written > limit {
                    self.cleanup_partial(&path).await;
                    return Err(StorageError::LimitExceeded { limit });
                }
            }

            hasher.update(&chunk);
            if let Err(e) = writer.write_all(&chunk).await {
                self.cleanup_partial(&path).await;
                return Err(StorageError::WriteFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        if let Err(e) = writer.flush().await {
            self.cleanup_partial(&path).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to flush file {}: {}",
                path.display(),
                e
            )));
        }

        if let Err(e) = writer.into_inner().sync_all().await {
            self.cleanup_partial(&path).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to sync file {}: {}",
                path.display(),
                e
            )));
        }

        let checksum = hex::encode(hasher.finalize());

        tracing::info!(
            path = %path.display(),
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob write successful"
        );

        Ok(StoredBlob {
            size: written,
            checksum,
        })
    }

    /// Open the blob named `name` as a chunked byte stream.
    pub async fn read_stream(&self, name: &str) -> StorageResult<BlobStream> {
        let path = self.name_to_path(name)?;

        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::ReadFailed(format!("Failed to open file {}: {}", path.display(), e))
            }
        })?;

        Ok(ReaderStream::with_capacity(file, self.chunk_size))
    }

    /// Delete the blob named `name`. A missing blob is not an error.
    pub async fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.name_to_path(name)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
