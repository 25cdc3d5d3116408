//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` shared by every layer of the service,
//! from value-object validation up to the HTTP routes.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so a handler returning
//! `Result<_, AppError>` is turned into a fixed HTTP status with a JSON body of the form
//! `{"error": "<message>"}`. Internal and database failures are logged with their detail
//! and reported to the client with a generic message.
//!
//! `From` conversions exist for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error` and `bcrypt::BcryptError` so `?` can be used throughout.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Convenience alias used by repositories and use cases.
pub type AppResult<T> = Result<T, AppError>;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Input has the right shape but violates a domain rule (HTTP 422).
    ValidationError(String),
    /// The chosen password does not meet the complexity rules (HTTP 422).
    InvalidPassword(String),
    /// The request could not be parsed at all: bad JSON, query or path id (HTTP 400).
    BadRequest(String),
    /// An account with this email already exists (HTTP 400).
    DuplicateEmail,
    /// An account with this username already exists (HTTP 400).
    DuplicateUsername,
    /// Unknown email, inactive account or wrong password (HTTP 401).
    InvalidCredentials,
    /// Missing, malformed, expired or wrongly-typed bearer token (HTTP 401).
    Unauthorized(String),
    /// The resource does not exist or is owned by someone else (HTTP 404).
    NotFound(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the database driver (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// The single error returned for missing and foreign tasks alike.
    pub fn task_not_found() -> Self {
        AppError::NotFound("Task not found".into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InvalidPassword(msg) => write!(f, "Invalid Password: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::DuplicateEmail => write!(f, "User with this email already exists"),
            AppError::DuplicateUsername => write!(f, "User with this username already exists"),
            AppError::InvalidCredentials => write!(f, "Invalid email or password"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidPassword(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::BadRequest(_)
            | AppError::DuplicateEmail
            | AppError::DuplicateUsername => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::ValidationError(msg)
            | AppError::InvalidPassword(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::DuplicateEmail
            | AppError::DuplicateUsername
            | AppError::InvalidCredentials => self.to_string(),
            // Internal details stay in the log.
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                "Internal server error".to_string()
            }
        };

        let mut response = HttpResponse::build(self.status_code());
        if matches!(self, AppError::Unauthorized(_)) {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        response.json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations on the `users` table become the matching duplicate
/// error so a sign-up race that slips past the pre-check still reports correctly.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                match db_error.constraint() {
                    Some(constraint) if constraint.contains("email") => AppError::DuplicateEmail,
                    Some(constraint) if constraint.contains("username") => {
                        AppError::DuplicateUsername
                    }
                    _ => AppError::DatabaseError(error.to_string()),
                }
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Routes JSON body extraction failures through `AppError::BadRequest`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Routes query string extraction failures through `AppError::BadRequest`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Routes path parameter extraction failures through `AppError::BadRequest`.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected path parameter: {}", err);
    AppError::BadRequest("Invalid resource id".into()).into()
}
