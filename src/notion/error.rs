use thiserror::Error;

use super::model::ApiErrorBody;

#[derive(Debug, Error)]
pub enum NotionError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NotionError {
    pub fn api(status: u16, body: ApiErrorBody) -> Self {
        NotionError::Api {
            status,
            message: body
                .message
                .unwrap_or_else(|| format!("Notion API error: {}", status)),
            code: body.code,
        }
    }

    /// Rate limiting and server hiccups worth a backoff-and-retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, NotionError::Api { status: 429 | 500 | 502 | 503, .. })
    }

    /// The request named a property the target database doesn't have (or has
    /// with another type).
    pub fn is_property_error(&self) -> bool {
        let NotionError::Api { code, message, .. } = self else {
            return false;
        };
        (code.as_deref() == Some("validation_error") && message.contains("body.properties"))
            || message.contains("is not a property that exists")
            || (message.contains("property") && message.contains("not") && message.contains("exist"))
    }
}
