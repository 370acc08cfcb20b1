use thiserror::Error;

pub const INVALID_RESPONSE_MESSAGE: &str = "Server returned an invalid response. Please try again.";
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to view job matches";
pub const MATCH_FAILED_MESSAGE: &str = "Failed to fetch job matches";
pub const MATCH_CANCELLED_MESSAGE: &str = "Job match request was cancelled";

/// Client-level error type.
/// Controllers turn every variant into a display message via
/// [`ClientError::upload_message`] or [`ClientError::match_message`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server response (content-type: {content_type:?})")]
    InvalidResponse { content_type: Option<String> },

    #[error("Upload rejected (status {status}): {message:?}")]
    UploadRejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid session token: {0}")]
    InvalidToken(&'static str),

    #[error("API error (status {status})")]
    Api { status: u16 },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Message shown when the parse exchange fails.
    /// Server-reported text is passed through verbatim.
    pub fn upload_message(&self) -> String {
        match self {
            ClientError::UploadRejected {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            ClientError::UploadRejected { .. } => UPLOAD_FAILED_MESSAGE.to_string(),
            ClientError::InvalidResponse { .. } | ClientError::Parse(_) => {
                INVALID_RESPONSE_MESSAGE.to_string()
            }
            ClientError::Unauthorized => LOGIN_REQUIRED_MESSAGE.to_string(),
            ClientError::Http(_)
            | ClientError::Api { .. }
            | ClientError::Io(_)
            | ClientError::InvalidToken(_) => UPLOAD_FAILED_MESSAGE.to_string(),
        }
    }

    /// Message shown when the match exchange fails.
    pub fn match_message(&self) -> String {
        match self {
            ClientError::Unauthorized => LOGIN_REQUIRED_MESSAGE.to_string(),
            _ => MATCH_FAILED_MESSAGE.to_string(),
        }
    }
}
