//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use thiserror::Error;
use tracker_common::AppError;
use tracker_core::{DomainError, PolicyViolation};

/// Message for every refresh failure, whatever the cause
pub const REFRESH_REVOKED: &str = "refresh token revoked";

/// Message for a wrong password or a password-less account
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Message when confirming a non-pending invitation
pub const INVITATION_USED: &str = "invitation already used or invalid";

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PolicyViolation(#[from] PolicyViolation),

    #[error("{0}")]
    Expired(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Transient store failure, the only kind worth retrying
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{resource} not found: {id}"))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// The uniform refresh failure
    pub fn refresh_revoked() -> Self {
        Self::Unauthorized(REFRESH_REVOKED.to_string())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Unauthorized(_) => 401,
            Self::Conflict(_) => 409,
            Self::PolicyViolation(_) => 422,
            Self::Expired(_) => 410,
            Self::Validation(_) => 400,
            Self::Unavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Conflict(_) => "CONFLICT",
            Self::PolicyViolation(v) => v.code(),
            Self::Expired(_) => "EXPIRED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UserNotFound(_)
            | DomainError::ProjectNotFound(_)
            | DomainError::InvitationNotFound => Self::NotFound(err.to_string()),
            DomainError::CredentialNotFound => Self::refresh_revoked(),
            DomainError::InvalidEmail(_) | DomainError::WeakPassword(_) => {
                Self::Validation(err.to_string())
            }
            DomainError::InvalidCredentials => Self::unauthorized(INVALID_CREDENTIALS),
            DomainError::Policy(violation) => Self::PolicyViolation(violation),
            DomainError::EmailAlreadyExists
            | DomainError::AlreadyMember
            | DomainError::InvitationTokenExists => Self::Conflict(err.to_string()),
            DomainError::InvitationAlreadyUsed => Self::conflict(INVITATION_USED),
            DomainError::InvitationExpired => Self::Expired(err.to_string()),
            DomainError::StoreUnavailable(msg) => Self::Unavailable(msg),
            DomainError::DatabaseError(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidToken | AppError::TokenExpired => Self::Unauthorized(err.to_string()),
            AppError::Database(_)
            | AppError::Cache(_)
            | AppError::Internal(_)
            | AppError::Config(_) => Self::Internal(err.to_string()),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
