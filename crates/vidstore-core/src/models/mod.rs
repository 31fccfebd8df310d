//! Domain models shared across crates.

mod file;

pub use file::{FileRecord, FileSummary, NewFileRecord, UploadResponse};
