//! Authentication extractor
//!
//! Verifies the Bearer access token from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracker_common::AccessClaims;
use tracker_core::UserId;
use tracker_service::{ServiceError, SessionService};

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from an access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub claims: AccessClaims,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let claims = SessionService::new(app_state.service_context())
            .authenticate(bearer.token())
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                e
            })?;

        let user_id = claims
            .user_id()
            .map_err(|_| ServiceError::unauthorized("invalid access token"))?;

        Ok(Self { user_id, claims })
    }
}
