//! The `{success, data, error, message, code}` wrapper returned by every endpoint

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            code: None,
        }
    }

    /// Failure envelope for `err`; `message` describes the operation that failed
    pub fn failure(err: &Error, message: &str) -> Self {
        error!(error = %err, code = err.code(), "{}", message);
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            message: Some(message.to_string()),
            code: Some(err.code().to_string()),
        }
    }

    pub fn from_result(result: Result<T>, failure_message: &str) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failure(&err, failure_message),
        }
    }

    /// Attach a message when the envelope reports success
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        if self.success {
            self.message = Some(message.into());
        }
        self
    }
}

impl ApiResponse<()> {
    /// Envelope for operations that return no data
    pub fn done(result: Result<()>, success_message: &str, failure_message: &str) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                data: None,
                error: None,
                message: Some(success_message.to_string()),
                code: None,
            },
            Err(err) => Self::failure(&err, failure_message),
        }
    }

    /// Failure raised before a handler ran, such as a rejected token or body
    pub fn rejected(error: impl Into<String>, code: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            code: Some(code.to_string()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
