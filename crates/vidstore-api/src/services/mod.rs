//! Business-logic services behind the route handlers.

mod file_service;

pub use file_service::FileService;
