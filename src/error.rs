//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler can produce is one of its variants, and each variant maps to
//! exactly one HTTP status code.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers return
//! `Result<_, AppError>` and Actix Web renders the error as a JSON body of the form
//! `{"detail": "..."}`. Storage and internal failures are logged here and replaced
//! with a generic message so no SQL or backend text ever reaches the client.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use validator::ValidationErrors;

/// Outward message for every token or identity failure.
pub const CREDENTIALS_INVALID: &str = "Could not validate credentials";

/// Outward message when no bearer token was presented.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    /// Carries a `WWW-Authenticate: Bearer` header.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The authenticated account may not touch the addressed resource (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// A uniqueness rule was violated, e.g. an email already registered (HTTP 400).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Malformed or semantically invalid request (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// The resource does not exist, or exists but belongs to someone else (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Input failed `validator` rules (HTTP 422).
    #[error("Validation Error: {0}")]
    ValidationError(String),
    /// Unexpected server-side error (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Error originating from the storage provider (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

impl AppError {
    /// The uniform 401 used for every token failure.
    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized(CREDENTIALS_INVALID.into())
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                "Internal server error"
            }
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                log::error!("{}: {}", self.status_code(), msg);
            }
            _ => {}
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::Unauthorized(_) = self {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(json!({ "detail": self.public_message() }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`, unique-constraint violations become `Conflict`,
/// everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Account already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into the uniform 401.
///
/// The underlying reason is only logged.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::invalid_credentials()
    }
}
