//! Business logic services
//!
//! Each service borrows the shared `ServiceContext` for the duration of a call.

pub mod context;
pub mod error;
pub mod health;
pub mod invitation;
pub mod session;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult, INVALID_CREDENTIALS, INVITATION_USED, REFRESH_REVOKED};
pub use health::HealthService;
pub use invitation::InvitationService;
pub use session::SessionService;
