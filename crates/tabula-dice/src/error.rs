//! Error types for tabula-dice

use thiserror::Error;

/// Dice error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid formula: {0}")]
    InvalidFormula(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
