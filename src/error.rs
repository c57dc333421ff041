use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a studio operation can decline a change.
///
/// None of these are fatal: the operation validates first and leaves state untouched
/// when it returns one of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StudioError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be at least {min} characters long")]
    TooShort { field: &'static str, min: usize },

    #[error("please enter a valid image URL: {0}")]
    InvalidUrl(String),

    #[error("please select a valid video file (got {0})")]
    WrongFileType(String),

    #[error("video file size must be less than {}MB (got {size} bytes)", .limit / (1024 * 1024))]
    FileTooLarge { size: u64, limit: u64 },

    #[error("could not read the uploaded file: {0}")]
    MalformedUpload(String),

    #[error("all options must be filled")]
    EmptyOption,

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: u32, max: u32 },

    #[error("unsupported value for {field}: {value}")]
    Unsupported { field: &'static str, value: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("course must have a title and at least one module")]
    NotPublishable,

    #[error("deleting a video must be confirmed")]
    ConfirmationRequired,

    #[error("operation was cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

impl StudioError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound { kind, id: id.to_string() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ConfirmationRequired => StatusCode::CONFLICT,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::WrongFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient message for the author, the equivalent of a toast.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "internal error");
        } else {
            tracing::warn!(error = %self, "rejected");
        }
        (status, Json(Notice::error(self.to_string()))).into_response()
    }
}

pub type StudioResult<T> = Result<T, StudioError>;
