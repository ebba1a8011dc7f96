//! Error handling and custom error types
//!
//! Provides unified error handling across the adapter using thiserror. Every
//! failure can also be rendered as an `error`-tagged structured item for the
//! host framework.

use crate::models::{ItemKind, StructuredItem};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gemini API error: {message}")]
    Provider {
        message: String,
        code: Option<i64>,
        status: Option<String>,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed Gemini response: {0}")]
    MalformedResponse(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),
}

impl Error {
    /// Render this error as an `error`-tagged structured item.
    ///
    /// Provider errors keep the message as content and expose `code` and
    /// `status` as additional properties; other errors use their display text.
    pub fn into_item(self) -> StructuredItem {
        match self {
            Error::Provider {
                message,
                code,
                status,
            } => {
                let mut item = StructuredItem::new(ItemKind::Error, message);
                if let Some(code) = code {
                    item.properties.insert("code".to_string(), code.into());
                }
                if let Some(status) = status {
                    item.properties.insert("status".to_string(), status.into());
                }
                item
            }
            other => StructuredItem::new(ItemKind::Error, other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_error_item_carries_code_and_status() {
        let item = Error::Provider {
            message: "bad key".to_string(),
            code: Some(403),
            status: Some("PERMISSION_DENIED".to_string()),
        }
        .into_item();

        assert_eq!(item.kind, ItemKind::Error);
        assert_eq!(item.content, "bad key");
        assert_eq!(item.properties.get("code"), Some(&json!(403)));
        assert_eq!(
            item.properties.get("status"),
            Some(&json!("PERMISSION_DENIED"))
        );
    }

    #[test]
    fn test_other_errors_use_display_text() {
        let item = Error::Config("GEMINI_API_KEY not set".to_string()).into_item();
        assert_eq!(item.kind, ItemKind::Error);
        assert_eq!(item.content, "Configuration error: GEMINI_API_KEY not set");
        assert!(item.properties.is_empty());
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "Request timed out after 60s");

        let err = Error::Timeout(Duration::from_millis(50));
        assert_eq!(err.to_string(), "Request timed out after 50ms");
    }
}
