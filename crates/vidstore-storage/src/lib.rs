//! Vidstore blob storage
//!
//! Local filesystem storage for uploaded file content: a single flat
//! directory of blobs named by the caller. Writes are streamed in chunks
//! with an incrementally computed SHA-256 digest; reads are streamed for
//! direct use as HTTP response bodies.

mod local;

pub use local::{BlobStorage, BlobStream, StorageError, StorageResult, StoredBlob};
