//! Error handling for the StockHome API

use std::fmt;
use thiserror::Error;

use crate::postgrest::PostgrestErrorDetails;

/// Postgres error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Unified error type for the provider client, repositories and handlers
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Errors reported by the authentication provider
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Errors reported by PostgREST
    #[error("Database error: {details} (Status: {status})")]
    Database {
        status: u16,
        details: PostgrestErrorDetails,
    },

    /// A single-row query matched nothing
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Missing or rejected bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request payload failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new not-found error
    pub fn not_found<T: fmt::Display>(msg: T) -> Self {
        Error::NotFound(msg.to_string())
    }

    /// Create a new unauthorized error
    pub fn unauthorized<T: fmt::Display>(msg: T) -> Self {
        Error::Unauthorized(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Machine-readable classification carried in failure envelopes
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::Unauthorized(_) => "UNAUTHORIZED",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Database { details, .. }
                if details.code.as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                "DUPLICATE"
            }
            _ => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn db_error(code: &str) -> Error {
        Error::Database {
            status: 409,
            details: PostgrestErrorDetails {
                code: Some(code.to_string()),
                message: Some("duplicate key value violates unique constraint".to_string()),
                details: None,
                hint: None,
            },
        }
    }

    #[test]
    fn classifies_errors_into_envelope_codes() {
        assert_eq!(Error::not_found("item").code(), "NOT_FOUND");
        assert_eq!(Error::unauthorized("no token").code(), "UNAUTHORIZED");
        assert_eq!(Error::validation("bad").code(), "VALIDATION_ERROR");
        assert_eq!(db_error("23505").code(), "DUPLICATE");
        assert_eq!(db_error("42703").code(), "INTERNAL_ERROR");
        assert_eq!(Error::general("boom").code(), "INTERNAL_ERROR");
    }

    #[test]
    fn database_error_display_includes_provider_message() {
        let text = db_error("23505").to_string();
        assert!(text.contains("Code: 23505"));
        assert!(text.contains("duplicate key"));
        assert!(text.contains("409"));
    }
}
