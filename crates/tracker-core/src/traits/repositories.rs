//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Operations that must be atomic (credential
//! rotation, invitation acceptance) are single trait methods so every adapter
//! owns its own transaction or critical section.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Invitation, Membership, Project, RefreshCredential, User};
use crate::error::DomainError;
use crate::value_objects::{CredentialId, Email, InvitationId, ProjectId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Identity Directory
// ============================================================================

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by normalised email
    async fn find_by_email(&self, email: &Email) -> RepoResult<Option<User>>;

    /// Create a new user, `EmailAlreadyExists` on a duplicate address
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Return the user with this email, creating a verified password-less one
    /// if none exists. Safe under concurrent calls for the same address.
    async fn find_or_provision(&self, email: &Email) -> RepoResult<User>;
}

// ============================================================================
// Credential Store
// ============================================================================

/// Result of an attempted rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Old credential revoked and successor inserted
    Rotated,
    /// Old credential was no longer usable; nothing changed
    Stale,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a freshly issued credential
    async fn insert(&self, credential: &RefreshCredential) -> RepoResult<()>;

    /// Find a credential by its `jti`
    async fn find(&self, id: CredentialId) -> RepoResult<Option<RefreshCredential>>;

    /// Atomically revoke `old_id` (only if still usable at `now` and its hash
    /// matches `expected_hash`), link it to `successor` and insert `successor`.
    async fn rotate(
        &self,
        old_id: CredentialId,
        expected_hash: &str,
        successor: &RefreshCredential,
        now: DateTime<Utc>,
    ) -> RepoResult<RotationOutcome>;

    /// Revoke a single credential. Returns false if it was already revoked.
    async fn revoke(&self, id: CredentialId, now: DateTime<Utc>) -> RepoResult<bool>;

    /// Revoke every unrevoked credential of a subject, returning the count
    async fn revoke_all_for_subject(&self, subject_id: UserId, now: DateTime<Utc>)
        -> RepoResult<u64>;
}

// ============================================================================
// Invitation Store
// ============================================================================

/// Result of an attempted acceptance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Status flipped and membership created
    Accepted,
    /// Invitation was no longer pending or already past due; nothing changed
    NotPending,
    /// Membership already existed; the status flip was rolled back
    AlreadyMember,
}

#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Persist a pending invitation, `InvitationTokenExists` on a token clash
    async fn insert(&self, invitation: &Invitation) -> RepoResult<()>;

    /// Find invitation by token
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Invitation>>;

    /// Pending, unexpired invitations for a guest within a project
    async fn count_pending_for_guest(
        &self,
        project_id: ProjectId,
        guest_email: &Email,
        now: DateTime<Utc>,
    ) -> RepoResult<u64>;

    /// Pending, unexpired invitations of a project
    async fn count_pending_for_project(
        &self,
        project_id: ProjectId,
        now: DateTime<Utc>,
    ) -> RepoResult<u64>;

    /// Pending, unexpired invitations of a project, oldest first
    async fn list_pending(
        &self,
        project_id: ProjectId,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<Invitation>>;

    /// Atomically flip pending to accepted and insert the membership
    ///
    /// Only an invitation still pending and not yet past due at `now` is accepted.
    async fn accept(
        &self,
        id: InvitationId,
        membership: &Membership,
        now: DateTime<Utc>,
    ) -> RepoResult<AcceptOutcome>;

    /// Flip a pending invitation to expired. Returns false if not pending.
    async fn expire(&self, id: InvitationId) -> RepoResult<bool>;

    /// Flip every pending invitation past its expiry, returning the count
    async fn expire_overdue(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Project Directory
// ============================================================================

#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    /// Find project by ID
    async fn find_by_id(&self, id: ProjectId) -> RepoResult<Option<Project>>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find a user's membership in a project
    async fn find(&self, project_id: ProjectId, user_id: UserId) -> RepoResult<Option<Membership>>;

    /// All members of a project
    async fn list_by_project(&self, project_id: ProjectId) -> RepoResult<Vec<Membership>>;
}
