//! Common error types used across all explorer crates
//! Provides consistent error handling and reporting

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when the backend rejects a query without saying why
pub const UNKNOWN_ERROR_MESSAGE: &str = "unknown";

/// Base error type for all explorer operations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ExplorerError {
    // Transport errors
    #[error("Network request failed: {message}")]
    Transport { message: String },

    #[error("Request timeout: {message}")]
    Timeout { message: String, duration_ms: u64 },

    // Backend errors
    #[error("Data fetch error: {message}")]
    Server { status: u16, message: String },

    #[error("Response parse error: {message}")]
    DataParse { message: String },

    // Chart sink errors
    #[error("Render failed: {message}")]
    Render { message: String },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
        field: Option<String>,
    },

    // WASM-specific errors
    #[error("JavaScript interop error: {message}")]
    JsInterop { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for explorer operations
pub type ExplorerResult<T> = Result<T, ExplorerError>;

impl ExplorerError {
    /// Build a server error, falling back to the generic message when the
    /// backend sent none (or an empty one).
    pub fn server(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
        ExplorerError::Server { status, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ExplorerError::Transport {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        ExplorerError::Render {
            message: message.into(),
        }
    }

    /// Whether the error should be shown to the user. Render and internal
    /// failures are defects and only get logged.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            ExplorerError::Render { .. } | ExplorerError::Internal { .. }
        )
    }
}

/// Error response structure for JavaScript interop
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ExplorerError,
    pub timestamp: u64,
    pub context: Option<ErrorContext>,
}

/// Additional context for error reporting
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
}

impl ErrorResponse {
    pub fn new(error: ExplorerError) -> Self {
        Self {
            success: false,
            error,
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
            context: None,
        }
    }

    pub fn with_context(mut self, component: &str, operation: &str) -> Self {
        self.context = Some(ErrorContext {
            component: component.to_string(),
            operation: operation.to_string(),
        });
        self
    }

    /// Convert to JSON string for JavaScript
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"type":"Internal","details":{"message":"Failed to serialize error"}}}"#.to_string()
        })
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::DataParse {
            message: err.to_string(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for ExplorerError {
    fn from(err: wasm_bindgen::JsValue) -> Self {
        ExplorerError::JsInterop {
            message: format!("{err:?}"),
        }
    }
}
