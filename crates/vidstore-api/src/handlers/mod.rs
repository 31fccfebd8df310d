//! Route handlers, one file per operation.

mod file_delete;
mod file_download;
mod file_list;
mod file_upload;

pub use file_delete::delete_file;
pub use file_download::download_file;
pub use file_list::list_files;
pub use file_upload::upload_file;
