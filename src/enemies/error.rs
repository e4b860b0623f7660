//! Error types for enemy data loading and validation.

use thiserror::Error;

/// Errors that can occur when loading or validating enemy definitions.
#[derive(Debug, Error)]
pub enum EnemyDataError {
    /// Directory or file could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// Disengage radius must not be smaller than the engage radius.
    #[error("Disengage range {disengage} is smaller than engage range {engage}")]
    RangeOrdering { engage: f32, disengage: f32 },

    /// A setting was out of bounds and has been clamped.
    #[error("Invalid value for '{field}': {details}")]
    InvalidValue { field: &'static str, details: String },

    /// A spawn referenced a type with no definition.
    #[error("Unknown enemy type '{0}'")]
    UnknownEnemyType(String),
}
