//! Database models - `FromRow` structs mirroring table rows

mod credential;
mod invitation;
mod membership;
mod project;
mod user;

pub use credential::RefreshCredentialModel;
pub use invitation::InvitationModel;
pub use membership::MembershipModel;
pub use project::ProjectModel;
pub use user::UserModel;
