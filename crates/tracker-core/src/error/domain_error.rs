//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::policy::PolicyViolation;
use crate::value_objects::{EmailParseError, ProjectId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Invitation not found")]
    InvitationNotFound,

    #[error("Refresh credential not found")]
    CredentialNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error(transparent)]
    InvalidEmail(#[from] EmailParseError),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Already a member of this project")]
    AlreadyMember,

    #[error("Invitation already used or invalid")]
    InvitationAlreadyUsed,

    #[error("Invitation token already exists")]
    InvitationTokenExists,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Invitation has expired")]
    InvitationExpired,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for log fields and API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ProjectNotFound(_) => "UNKNOWN_PROJECT",
            Self::InvitationNotFound => "UNKNOWN_INVITATION",
            Self::CredentialNotFound => "UNKNOWN_CREDENTIAL",

            // Validation
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::WeakPassword(_) => "WEAK_PASSWORD",

            // Authorization
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Policy(violation) => violation.code(),

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::InvitationAlreadyUsed => "INVITATION_ALREADY_USED",
            Self::InvitationTokenExists => "INVITATION_TOKEN_EXISTS",

            // Business Rules
            Self::InvitationExpired => "INVITATION_EXPIRED",

            // Infrastructure
            Self::StoreUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Transient failures are the only ones worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
