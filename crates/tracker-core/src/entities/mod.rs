//! Domain entities - core business objects

mod credential;
mod invitation;
mod membership;
mod project;
mod user;

pub use credential::RefreshCredential;
pub use invitation::{Invitation, InvitationStatus};
pub use membership::Membership;
pub use project::{Project, ProjectStatus};
pub use user::User;
