//! Unified error type for the fallible editor operations.
//!
//! Graph mutations never fail; errors only come from decoding external input
//! (drag payloads, definition DTOs) and from the workflows API.

use thiserror::Error;

pub type Result<T, E = EditorError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EditorError {
    /// A palette drag payload could not be decoded.
    #[error("[{code}] {message}")]
    Payload { code: &'static str, message: String },

    /// A workflow definition could not be mapped back onto the canvas.
    #[error("[{code}] {message}{}", activity_suffix(.activity_id))]
    Translate {
        code: &'static str,
        message: String,
        activity_id: Option<String>,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

fn activity_suffix(activity_id: &Option<String>) -> String {
    match activity_id {
        Some(id) => format!(" (activity '{}')", id),
        None => String::new(),
    }
}

impl EditorError {
    pub fn payload(code: &'static str, message: impl Into<String>) -> Self {
        EditorError::Payload {
            code,
            message: message.into(),
        }
    }

    pub fn translate(
        code: &'static str,
        message: impl Into<String>,
        activity_id: Option<String>,
    ) -> Self {
        EditorError::Translate {
            code,
            message: message.into(),
            activity_id,
        }
    }

    /// Short error code, if the error carries one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            EditorError::Payload { code, .. } | EditorError::Translate { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Text shown in the transient error notification.
    pub fn user_message(&self) -> String {
        match self {
            EditorError::Payload { message, .. } | EditorError::Translate { message, .. } => {
                message.clone()
            }
            EditorError::Http(e) => format!("Network error: {}", e),
            EditorError::Status { message, .. } if !message.is_empty() => message.clone(),
            EditorError::Status { status, .. } => format!("Request failed with status {}", status),
            EditorError::Serde(e) => format!("Unexpected response: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_error_display_names_activity() {
        let err = EditorError::translate("T001", "Unknown activity type 'sink'", Some("a".into()));
        assert_eq!(err.to_string(), "[T001] Unknown activity type 'sink' (activity 'a')");
        assert_eq!(err.code(), Some("T001"));
    }

    #[test]
    fn status_error_falls_back_to_status_code() {
        let err = EditorError::Status {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "Request failed with status 502");
    }
}
