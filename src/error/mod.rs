// Error types for the shellproxy service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Network failure: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cache store error: {0}")]
    Store(String),

    #[error("Install failed: {0}")]
    Install(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// True when the failure came from the network layer rather than from
    /// this service itself. Only these errors trigger the cache fallback.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ProxyError::Network(_) | ProxyError::Http(_))
    }
}

// Convert ProxyError to HTTP responses for Axum
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ProxyError::Network(_) | ProxyError::Http(_) => {
                (StatusCode::BAD_GATEWAY, "upstream_error", self.to_string())
            }
            ProxyError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", self.to_string())
            }
            ProxyError::Config(_) | ProxyError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error", self.to_string())
            }
            ProxyError::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "cache_error", self.to_string())
            }
            ProxyError::Install(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "install_error", self.to_string())
            }
            _ => {
                (StatusCode::INTERNAL_SERVER_ERROR, "api_error", self.to_string())
            }
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
