//! Error types for Sinapsi.
//!
//! This module defines a unified error enum that covers every error category
//! in the service: configuration, I/O, web search, page fetching, rule
//! loading, request decoding, and serialization.

use thiserror::Error;

/// Unified error type for Sinapsi.
///
/// Fallible functions return `Result<T, AppError>`. Stages of the answer
/// pipeline that are best-effort absorb these errors into empty values; only
/// configuration and malformed-request errors reach the caller.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Web search provider errors
    #[error("Search error: {0}")]
    Search(String),

    /// Page fetch errors
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Rule file and pattern errors
    #[error("Rules error: {0}")]
    Rules(String),

    /// Malformed request errors
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
