pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Response header carrying the machine-readable [`ErrorCode`].
pub const ERROR_CODE_HEADER: HeaderName = HeaderName::from_static("x-error-code");

/// Application error type that can be converted to HTTP responses.
///
/// This is the single place where an error kind becomes a status code. Responses carry a
/// plain-text message body and the [`ErrorCode`] string in the `x-error-code` header.
/// Server-side errors are logged with their details and answered with a generic message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Corrupt data: {0}")]
    DataCorruption(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Status code for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(_)
            | AppError::Validation(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DataCorruption(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Error code reported to clients and in logs.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::JsonExtractorRejection(_) => ErrorCode::InvalidJson,
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::BadRequest(_) => ErrorCode::InvalidInput,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::DataCorruption(_) => ErrorCode::CorruptData,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        let message = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = code.code(),
                    "JSON extraction error: {}",
                    e.body_text()
                );
                code.default_message().to_string()
            }
            AppError::Validation(msg) => {
                tracing::info!(error_code = code.code(), "Validation error: {}", msg);
                msg
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = code.code(), "Bad request: {}", msg);
                msg
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = code.code(), "Not found: {}", msg);
                msg
            }
            AppError::Conflict(msg) => {
                tracing::info!(error_code = code.code(), "Conflict: {}", msg);
                msg
            }
            AppError::DataCorruption(msg) => {
                tracing::error!(error_code = code.code(), "Corrupt data: {}", msg);
                code.default_message().to_string()
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = code.code(),
                    "Internal server error: {}",
                    msg
                );
                code.default_message().to_string()
            }
        };

        (status, [(ERROR_CODE_HEADER, code.as_str())], message).into_response()
    }
}
