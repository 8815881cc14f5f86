//! User handlers

use axum::{extract::State, Json};
use tracker_service::dto::{RegisterRequest, RevokedSessionsResponse, SessionResponse};
use tracker_service::SessionService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new user and open their first session
///
/// POST /users
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<SessionResponse>>> {
    let service = SessionService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Revoke every refresh token of the caller
///
/// DELETE /users/me/sessions
pub async fn sign_out_everywhere(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<RevokedSessionsResponse>> {
    let service = SessionService::new(state.service_context());
    let revoked = service.sign_out_everywhere(auth.user_id).await?;
    Ok(Json(RevokedSessionsResponse { revoked }))
}
