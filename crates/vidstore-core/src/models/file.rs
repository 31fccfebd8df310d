//! File metadata models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the `files` table: an uploaded (or soft-deleted) file.
///
/// `fileid` is the externally visible identifier, derived from the original
/// filename and disambiguated on collision. `path` is the on-disk storage
/// filename, unique by construction (timestamp prefix). `name` is the
/// original filename, restored on download.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FileRecord {
    pub id: i64,
    pub fileid: String,
    pub path: String,
    pub name: String,
    pub size: i64,
    pub checksum: String,
    pub mime: String,
    pub created_at: DateTime<Utc>,
    pub deleted: bool,
}

/// Fields for inserting a new file record; `id` and `deleted` are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub fileid: String,
    pub path: String,
    pub name: String,
    pub size: i64,
    pub checksum: String,
    pub mime: String,
    pub created_at: DateTime<Utc>,
}

/// List item returned by `GET /files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub fileid: String,
    pub name: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for FileSummary {
    fn from(record: FileRecord) -> Self {
        FileSummary {
            fileid: record.fileid,
            name: record.name,
            size: record.size,
            created_at: record.created_at,
        }
    }
}

/// Body returned by a successful upload, alongside the `Location` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub fileid: String,
    pub name: String,
    pub size: i64,
    pub checksum: String,
    pub mime: String,
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for UploadResponse {
    fn from(record: FileRecord) -> Self {
        UploadResponse {
            fileid: record.fileid,
            name: record.name,
            size: record.size,
            checksum: record.checksum,
            mime: record.mime,
            created_at: record.created_at,
        }
    }
}
