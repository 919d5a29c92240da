/// Unified error types for Kumano
use crate::account::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the site
#[derive(Error, Debug)]
pub enum KumanoError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// External provider handshake failed or was rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Not allowed to perform the action
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Invitation token unknown or already redeemed
    #[error("Invitation not found")]
    InvitationNotFound,

    /// Record validation failed
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors (e.g. concurrent activation of the same placeholder)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Session store errors
    #[error("Session error: {0}")]
    Session(String),

    /// Outbound mail errors
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl KumanoError {
    pub fn status(&self) -> StatusCode {
        match self {
            KumanoError::Authentication(_) => StatusCode::UNAUTHORIZED,
            KumanoError::Authorization(_) | KumanoError::InvitationNotFound => {
                StatusCode::FORBIDDEN
            }
            KumanoError::NotFound(_) => StatusCode::NOT_FOUND,
            KumanoError::Conflict(_) => StatusCode::CONFLICT,
            KumanoError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert KumanoError to HTTP response
impl IntoResponse for KumanoError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message, errors) = match self {
            KumanoError::Authentication(_) => ("AuthenticationRequired", self.to_string(), None),
            KumanoError::Authorization(_) => ("Forbidden", self.to_string(), None),
            KumanoError::InvitationNotFound => ("InvitationInvalid", self.to_string(), None),
            KumanoError::NotFound(_) => ("NotFound", self.to_string(), None),
            KumanoError::Conflict(_) => ("Conflict", self.to_string(), None),
            KumanoError::Validation(errors) => (
                "ValidationFailed",
                "Validation failed".to_string(),
                Some(errors),
            ),
            ref other => {
                tracing::error!("request failed: {}", other);
                (
                    "InternalServerError",
                    "Internal server error".to_string(), // Don't leak details
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for Kumano operations
pub type KumanoResult<T> = Result<T, KumanoError>;
