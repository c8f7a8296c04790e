//! Error types for Stardust

use thiserror::Error;

/// Result type alias using Stardust's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Stardust operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid generation parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Malformed color string
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
