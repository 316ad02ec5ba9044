//! Magnetar Core - Shared configuration, logging and error types
//!
//! This crate holds the pieces every Magnetar binary needs regardless of
//! which providers are compiled in: the configuration tree, the tracing
//! bootstrap and the top-level error type.

pub mod config;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{MagnetarConfig, NetworkConfig, SearchConfig, ServerConfig};
pub use tracing_setup::{CliLogLevel, init_tracing};

/// Process-level errors that can bubble up from any Magnetar subsystem.
///
/// Covers what stops a process from starting or serving. Search failures
/// keep their own type inside the engine and become `Search` only when they
/// reach a process boundary such as the CLI.
#[derive(Debug, thiserror::Error)]
pub enum MagnetarError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {reason}")]
    Server { reason: String },

    #[error("Search failed: {reason}")]
    Search { reason: String },
}

impl MagnetarError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MagnetarError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            MagnetarError::Io(_) => "File system error occurred".to_string(),
            MagnetarError::Server { reason } => format!("Server failed: {reason}"),
            MagnetarError::Search { reason } => reason.clone(),
        }
    }

    /// Wraps any displayable error as a server failure.
    pub fn from_server_error(error: impl std::fmt::Display) -> Self {
        MagnetarError::Server {
            reason: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MagnetarError>;
