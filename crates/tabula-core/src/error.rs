//! Error types for tabula-core
//!
//! Unknown ids, rejected mutations and empty logs are not errors: those
//! operations hand back the input snapshot unchanged. The variants here only
//! surface when a game is converted to or from its archived form.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Transform cannot be serialized: custom transform `{0}`")]
    UnserializableTransform(String),

    #[error("Archive references unknown value record {0}")]
    UnknownValueRef(usize),

    #[error("Archive references unknown action record {0}")]
    UnknownActionRef(usize),

    #[error("Corrupt archive: {0}")]
    Corrupt(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
