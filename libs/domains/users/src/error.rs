use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Validation(String),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupt record at line {line}: {reason}")]
    CorruptRecord { line: u64, reason: String },
}

pub type UserResult<T> = Result<T, UserError>;

impl From<csv::Error> for UserError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Utf8 { .. } | csv::ErrorKind::UnequalLengths { .. } => {
                UserError::CorruptRecord {
                    line: err.position().map(|p| p.line()).unwrap_or_default(),
                    reason: err.to_string(),
                }
            }
            _ => UserError::Storage(err.to_string()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidInput(msg) => AppError::BadRequest(msg),
            UserError::Validation(msg) => AppError::Validation(msg),
            UserError::DuplicateEmail(email) => {
                AppError::Conflict(format!("User with email '{}' already exists", email))
            }
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::Storage(msg) => AppError::InternalServerError(msg),
            err @ UserError::CorruptRecord { .. } => AppError::DataCorruption(err.to_string()),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
