//! HTTP server layer
//!
//! Axum server with:
//! - CORS (all origins)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod server;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_router, run_server, serve_until, AppState, ServerError};
pub use error::ApiError;
