//! Transport-level failures of the form REST API

use serde_json::Value;
use thiserror::Error;

/// Where the server puts its user-facing error text
const GLOBAL_ERROR_POINTER: &str = "/error/globalErrors/0/message";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        server_message: Option<String>,
    },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body could not be read
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Build an HTTP failure, picking up the server's structured message if the body has one
    pub fn from_response(status: u16, reason: &str, body: &str) -> Self {
        ApiError::Http {
            status,
            message: format!("{status} {reason}"),
            server_message: extract_global_error(body),
        }
    }

    /// Best available message for the user
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http {
                server_message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_timeout() {
            ApiError::Network("Request timeout".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to server".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Pull `error.globalErrors[0].message` out of a failure body.
/// Empty messages count as absent.
pub fn extract_global_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer(GLOBAL_ERROR_POINTER)
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
