//! Error types for tabula-journal

use thiserror::Error;

/// Journal error type
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Export error
    #[error("Export error: {0}")]
    Export(String),

    /// The game could not be archived or rebuilt
    #[error("Archive error: {0}")]
    Core(#[from] tabula_core::Error),
}

/// Result type for journal operations
pub type Result<T> = std::result::Result<T, Error>;
