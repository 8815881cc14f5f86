//! Session handlers
//!
//! Sign-in, refresh rotation and sign-out.

use axum::{extract::State, Json};
use tracker_service::dto::{RefreshTokenRequest, SessionResponse, SignInRequest};
use tracker_service::SessionService;

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Sign in with email and password
///
/// POST /session
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let service = SessionService::new(state.service_context());
    let response = service.sign_in(request).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new pair
///
/// POST /session/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let service = SessionService::new(state.service_context());
    let response = service.refresh(request).await?;
    Ok(Json(response))
}

/// Revoke one refresh token
///
/// DELETE /session
pub async fn sign_out(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<NoContent> {
    let service = SessionService::new(state.service_context());
    service.sign_out(request).await?;
    Ok(NoContent)
}
