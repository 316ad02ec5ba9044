//! Magnetar Web - JSON API Server

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
//!
//! Serves the aggregation engine over HTTP: search, provider and category
//! listings, and a liveness check.

pub mod errors;
pub mod handlers;
pub mod server;

// Re-export main types
pub use errors::ApiError;
pub use server::{AppState, router, run_server};
