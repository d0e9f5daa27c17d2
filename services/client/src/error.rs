//! services/client/src/error.rs
//!
//! Defines the primary error type for the client application.

use crate::config::ConfigError;
use learning_path_core::FlowError;

/// The primary error type for the `learning_path_client` crate.
///
/// Backend failures never appear here; the flow controller turns them into
/// notices.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A controller operation was called when it was not allowed.
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// Represents an error from the HTTP client library while building it.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., reading a resume file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A background request task panicked or was cancelled.
    #[error("Request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
