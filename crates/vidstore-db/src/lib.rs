//! Vidstore database layer
//!
//! Repository over the `files` table. All reads filter on the soft-delete
//! flag; rows are never physically removed.

mod files;

pub use files::{FileRepository, Pagination};
