//! HTTP API for the chunking service.

pub mod handlers;

pub use handlers::AppState;
