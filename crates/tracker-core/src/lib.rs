//! # tracker-core
//!
//! Domain layer for identity sessions and project invitations: entities, value
//! objects, the membership policy, outbound notifications and the store traits
//! the service layer depends on.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Invitation, InvitationStatus, Membership, Project, ProjectStatus, RefreshCredential, User,
};
pub use error::DomainError;
pub use events::{
    InvitationConfirmed, InvitationCreated, Notification, SessionIssued, SessionRefreshed, Topic,
};
pub use policy::{InvitationCaps, InviteCheck, MembershipPolicy, PolicyViolation};
pub use traits::{
    AcceptOutcome, CredentialStore, HealthProbe, InvitationStore, MembershipRepository,
    Notifier, NotifyError, NoopNotifier, ProjectDirectory, RepoResult, RotationOutcome,
    UserDirectory,
};
pub use value_objects::{
    CredentialId, Email, EmailParseError, IdParseError, InvitationId, ProjectId, ProjectRole,
    UserId,
};
