//! Error types for the gastoscan-core library.
//!
//! Field extraction itself never fails; these errors cover the ambient
//! surfaces around it (configuration files, category labels).

use thiserror::Error;

/// Main error type for the gastoscan library.
#[derive(Error, Debug)]
pub enum ScanError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A category label that is not one of the known categories.
    #[error("unknown category: {0}")]
    InvalidCategory(String),
}

/// Result type for the gastoscan library.
pub type Result<T> = std::result::Result<T, ScanError>;
