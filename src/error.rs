//! Error types for Bookyard server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes exposed in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthenticated = 2,
    NotAuthorized = 3,
    DbFailure = 4,
    NoSuchProfile = 5,
    NoSuchBook = 6,
    NoSuchReservation = 7,
    InsufficientCredits = 8,
    InvalidTransition = 9,
    BadValue = 10,
    BonusAlreadyClaimed = 11,
    Conflict = 12,
    InvalidWindow = 13,
}

/// Kind of resource a lookup failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Profile,
    Book,
    Reservation,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Profile => "profile",
            Entity::Book => "book",
            Entity::Reservation => "reservation",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    #[error("Authorization failed: {0}")]
    Forbidden(String),

    #[error("Not found: {1}")]
    NotFound(Entity, String),

    #[error("Insufficient credits: {0}")]
    InsufficientCredits(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Already claimed: {0}")]
    AlreadyClaimed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthenticated(_) => ErrorCode::NotAuthenticated,
            AppError::Forbidden(_) => ErrorCode::NotAuthorized,
            AppError::NotFound(Entity::Profile, _) => ErrorCode::NoSuchProfile,
            AppError::NotFound(Entity::Book, _) => ErrorCode::NoSuchBook,
            AppError::NotFound(Entity::Reservation, _) => ErrorCode::NoSuchReservation,
            AppError::InsufficientCredits(_) => ErrorCode::InsufficientCredits,
            AppError::InvalidTransition(_) => ErrorCode::InvalidTransition,
            AppError::InvalidWindow(_) => ErrorCode::InvalidWindow,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::AlreadyClaimed(_) => ErrorCode::BonusAlreadyClaimed,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_, _) => StatusCode::NOT_FOUND,
            AppError::InsufficientCredits(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidTransition(_) => StatusCode::CONFLICT,
            AppError::InvalidWindow(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyClaimed(_) => StatusCode::CONFLICT,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status = self.status();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Unauthenticated("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InsufficientCredits("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::InvalidTransition("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidWindow("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AlreadyClaimed("x".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_codes_follow_entity() {
        // The wording of the detail must not influence the code
        assert_eq!(
            AppError::NotFound(Entity::Profile, "Book 3".into()).code(),
            ErrorCode::NoSuchProfile
        );
        assert_eq!(
            AppError::NotFound(Entity::Reservation, "anything".into()).code(),
            ErrorCode::NoSuchReservation
        );
        assert_eq!(
            AppError::NotFound(Entity::Book, "Reservation 3".into()).code(),
            ErrorCode::NoSuchBook
        );
    }

    #[test]
    fn test_invalid_window_has_its_own_code() {
        assert_eq!(
            AppError::InvalidWindow("x".into()).code(),
            ErrorCode::InvalidWindow
        );
        assert_ne!(
            AppError::InvalidWindow("x".into()).code(),
            AppError::Validation("x".into()).code()
        );
    }
}
