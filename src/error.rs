use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Implement conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

// Add conversion from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl AppError {
    /// Message sent to the client. Server-side failures are collapsed to a
    /// generic message so internal detail never reaches the response body.
    fn client_message(&self) -> String {
        match self {
            AppError::AuthError(e) => e.to_string(),
            AppError::StoreError(e) => e.to_string(),
            AppError::ValidationError(msg) => msg.clone(),
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

// Implement actix_web::ResponseError for AppError
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
        }
        HttpResponse::build(status).json(json!({
            "message": self.client_message()
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthError(e) => match e {
                AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
                AuthError::NoToken => StatusCode::UNAUTHORIZED,
                AuthError::MalformedHeader => StatusCode::UNAUTHORIZED,
                AuthError::InvalidToken => StatusCode::BAD_REQUEST,
                AuthError::TokenExpired => StatusCode::BAD_REQUEST,
                AuthError::HashingFailed => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::StoreError(e) => match e {
                StoreError::DuplicateUsername => StatusCode::CONFLICT,
                StoreError::BookNotFound => StatusCode::NOT_FOUND,
                StoreError::BookUnavailable => StatusCode::BAD_REQUEST,
                StoreError::BookNotIssued => StatusCode::BAD_REQUEST,
            },
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// Uniform for unknown username and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied: no token provided")]
    NoToken,

    #[error("Access denied: token format invalid")]
    MalformedHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Password hashing failed")]
    HashingFailed,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User already exists")]
    DuplicateUsername,

    #[error("Book not found")]
    BookNotFound,

    #[error("Book already issued or not found")]
    BookUnavailable,

    #[error("Book not issued")]
    BookNotIssued,
}
