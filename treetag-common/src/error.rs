//! Common error types for the tree-tagging service

use thiserror::Error;

/// Common result type for tree-tagging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared between the web service and library code
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error (missing credential, bad value)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document store request failed (transport or non-success status)
    #[error("Store error: {0}")]
    Store(String),

    /// Media host request failed
    #[error("Media error: {0}")]
    Media(String),

    /// AI text-generation or plant-identification request failed
    #[error("AI service error: {0}")]
    Ai(String),

    /// Identity provider request failed
    #[error("Identity error: {0}")]
    Identity(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
