//! Repository implementations
//!
//! PostgreSQL implementations of the store traits defined in tracker-core.

mod credential;
mod error;
mod invitation;
mod membership;
mod project;
mod user;

pub use credential::PgCredentialStore;
pub use error::{map_db_error, map_unique_violation};
pub use invitation::PgInvitationStore;
pub use membership::PgMembershipRepository;
pub use project::PgProjectDirectory;
pub use user::PgUserDirectory;
