//! Vidstore HTTP API
//!
//! Route handlers, the file service, and server setup. The binary entry
//! point lives in `main.rs`; integration tests build the router through
//! [`setup::routes::build_router`].

pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
