//! Error handling for the dashboard core

use std::fmt;
use thiserror::Error;

/// Unified error type for the dashboard core
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Credential or session errors reported by the auth endpoints
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-success responses from the client endpoints
    #[error("API error: {0}")]
    Api(String),

    /// Persisted token slot errors
    #[error("Token store error: {0}")]
    Store(String),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new API error
    pub fn api<T: fmt::Display>(msg: T) -> Self {
        Error::Api(msg.to_string())
    }

    /// Create a new token store error
    pub fn store<T: fmt::Display>(msg: T) -> Self {
        Error::Store(msg.to_string())
    }
}
