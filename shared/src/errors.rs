//! Error types for the fitlog calculation library

use thiserror::Error;

/// Errors raised by the strict entry points of the library.
///
/// The estimators themselves are total and never fail; only the optional
/// validating variants and the lookups keyed by caller-supplied strings
/// return these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown widget: {0}")]
    UnknownWidget(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result alias for fallible library calls
pub type CalcResult<T> = Result<T, CalcError>;
