//! Ports - the interfaces the service layer depends on

mod health;
mod notifier;
mod repositories;

pub use health::HealthProbe;
pub use notifier::{NoopNotifier, Notifier, NotifyError};
pub use repositories::{
    AcceptOutcome, CredentialStore, InvitationStore, MembershipRepository, ProjectDirectory,
    RepoResult, RotationOutcome, UserDirectory,
};
