use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid token format")]
    InvalidTokenFormat,

    #[error("invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("user not found")]
    UserNotFound,

    #[error("user with this email already exists")]
    EmailTaken,

    #[error("user with this username already exists")]
    UsernameTaken,

    #[error("invalid user role: {0}")]
    InvalidRole(String),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("document serialization error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("message queue error: {0}")]
    Queue(#[from] lapin::Error),

    #[error("message to queue '{0}' was not acknowledged")]
    QueueRejected(String),

    #[error("failed to sign token: {0}")]
    Token(#[source] jsonwebtoken::errors::Error),

    #[error("password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated
            | AppError::InvalidTokenFormat
            | AppError::InvalidToken(_)
            | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::EmailTaken | AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::InvalidRole(_)
            | AppError::Database(_)
            | AppError::Bson(_)
            | AppError::Queue(_)
            | AppError::QueueRejected(_)
            | AppError::Token(_)
            | AppError::PasswordHash(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Server-side details stay in the log, clients get a generic message.
        let message = if status.is_server_error() {
            log::error!("❌ {}", self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": message
        }))
    }
}
