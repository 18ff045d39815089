use crate::models::Category;
use reqwest::StatusCode;
use thiserror::Error;

pub const RETRY_MESSAGE: &str = "Could not reach the server. Check your connection and try again.";
pub const INVALID_CREDENTIAL_MESSAGE: &str =
    "Your session is no longer valid. Please sign in again.";
pub const INVALID_CODE_MESSAGE: &str = "Invalid verification code";
pub const INVALID_ADMIN_PASSWORD_MESSAGE: &str = "Invalid admin password";

/// A non-2xx answer from the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Builds the error from a response body, preferring the server's
    /// `detail` or `message` field over the reason phrase.
    pub fn from_body(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["detail", "message"].iter().find_map(|key| {
                    value
                        .get(*key)
                        .and_then(|field| field.as_str())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        Self::new(status, message)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED || self.status == StatusCode::FORBIDDEN
    }
}

/// Rejections raised before an entry ever reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Total hours must be greater than 0")]
    ZeroTotal,

    #[error("{0} hours cannot be negative")]
    NegativeHours(Category),

    #[error("Total hours cannot exceed 24")]
    TotalExceedsDay,

    #[error("{0} note cannot be longer than 500 characters")]
    NoteTooLong(Category),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Every failure a controller can report.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid verification code")]
    InvalidCode,

    #[error("another request from this form is still in flight")]
    Busy,

    #[error("admin view is locked")]
    Locked,
}

impl ClientError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_unauthorized())
    }

    /// Text suitable for showing to the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => RETRY_MESSAGE.to_string(),
            Self::Api(err) if err.is_unauthorized() => INVALID_CREDENTIAL_MESSAGE.to_string(),
            Self::Api(err) => err.message.clone(),
            Self::Validation(err) => err.to_string(),
            Self::InvalidCode => INVALID_CODE_MESSAGE.to_string(),
            Self::Busy => "Please wait for the previous request to finish.".to_string(),
            Self::Locked => "Enter the admin password to continue.".to_string(),
        }
    }

    /// Same as [`ClientError::user_message`] but for the admin channel, where
    /// an authorization failure means the passphrase was rejected.
    pub fn admin_message(&self) -> String {
        if self.is_unauthorized() {
            INVALID_ADMIN_PASSWORD_MESSAGE.to_string()
        } else {
            self.user_message()
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(format!("unexpected response body: {err}"))
    }
}
