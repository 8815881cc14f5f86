//! Value objects - immutable types that represent domain concepts

mod email;
mod ids;
mod role;

pub use email::{Email, EmailParseError};
pub use ids::{CredentialId, IdParseError, InvitationId, ProjectId, UserId};
pub use role::ProjectRole;
