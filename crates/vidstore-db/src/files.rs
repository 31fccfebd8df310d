use sqlx::{PgPool, Postgres};
use vidstore_core::models::{FileRecord, NewFileRecord};
use vidstore_core::AppError;

/// Offset/limit pagination. A `limit` of zero or less means unlimited.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { skip: 0, limit: 0 }
    }
}

/// Repository for the `files` table.
#[derive(Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new file record and return the stored row.
    #[tracing::instrument(skip(self, record), fields(db.table = "files", db.operation = "insert", fileid = %record.fileid))]
    pub async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let row: FileRecord = sqlx::query_as::<Postgres, FileRecord>(
            r#"
            INSERT INTO files (fileid, path, name, size, checksum, mime, created_at, deleted)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            RETURNING *
            "#,
        )
        .bind(&record.fileid)
        .bind(&record.path)
        .bind(&record.name)
        .bind(record.size)
        .bind(&record.checksum)
        .bind(&record.mime)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Find a non-deleted record by its external identifier.
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    pub async fn find_by_fileid(&self, fileid: &str) -> Result<Option<FileRecord>, AppError> {
        let row: Option<FileRecord> = sqlx::query_as::<Postgres, FileRecord>(
            r#"
            SELECT * FROM files
            WHERE fileid = $1 AND deleted = FALSE
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(fileid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// List non-deleted records in insertion order. Offset and limit are
    /// applied only when the limit is positive.
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    pub async fn list(&self, pagination: Pagination) -> Result<Vec<FileRecord>, AppError> {
        let rows: Vec<FileRecord> = if pagination.limit > 0 {
            sqlx::query_as::<Postgres, FileRecord>(
                r#"
                SELECT * FROM files
                WHERE deleted = FALSE
                ORDER BY id
                OFFSET $1 LIMIT $2
                "#,
            )
            .bind(pagination.skip.max(0))
            .bind(pagination.limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<Postgres, FileRecord>(
                r#"
                SELECT * FROM files
                WHERE deleted = FALSE
                ORDER BY id
                "#,
            )
            .fetch_all(&self.pool)
            .await?
        };

        Ok(rows)
    }

    /// Flip the soft-delete flag on one row. Returns whether a row changed.
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "update"))]
    pub async fn mark_deleted(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE files SET deleted = TRUE
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
