//! Error types for the face pose synchronization library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Landmark source (capture/detector) initialization or delivery failure.
    /// Fatal to the session; recovery is a full restart.
    #[error("Landmark source error: {0}")]
    SourceError(String),

    /// Renderer initialization or frame submission failure.
    /// Fatal to the session; recovery is a full restart.
    #[error("Render error: {0}")]
    RenderError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
