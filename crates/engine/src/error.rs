//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a record or a rate-table entry is missing.
//! - [`InvalidInput`] thrown when a caller-supplied value is out of range.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidInput`]: EngineError::InvalidInput
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
///
/// None of these are transient: given the same inputs the same error is
/// returned, so retry policies belong to the caller.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
