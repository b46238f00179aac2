//! Error types for the Trilogy crate
//!
//! This module contains all error types that can be returned by Trilogy operations.

use thiserror::Error;

use crate::identifiers::IdentifierError;

#[derive(Error, Debug)]
pub enum TrilogyError {
    #[error("{0}")]
    Validation(#[from] validation::ValidationFailure),

    #[error("Cast error: {0}")]
    Cast(#[from] type_mapping::CastError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Unknown column '{column}' in model '{model}'")]
    UnknownColumn { model: String, column: String },

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),
}
