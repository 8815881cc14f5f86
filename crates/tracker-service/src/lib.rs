//! # tracker-service
//!
//! Application layer: the session and invitation use cases, their DTOs and the
//! service error taxonomy.

pub mod dto;
pub mod services;

pub use services::{
    HealthService, InvitationService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SessionService, INVALID_CREDENTIALS, INVITATION_USED, REFRESH_REVOKED,
};
