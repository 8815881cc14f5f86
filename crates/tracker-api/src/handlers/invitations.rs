//! Invitation handlers

use axum::{extract::State, Json};
use tracker_core::ProjectId;
use tracker_service::dto::{
    ConfirmInvitationRequest, ConfirmationResponse, CreateInvitationRequest, InvitationResponse,
};
use tracker_service::InvitationService;

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Invite a guest into a project
///
/// POST /projects/:project_id/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(project_id): IdPath<ProjectId>,
    ValidatedJson(request): ValidatedJson<CreateInvitationRequest>,
) -> ApiResult<Created<Json<InvitationResponse>>> {
    let service = InvitationService::new(state.service_context());
    let response = service.invite(project_id, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// List pending invitations of a project
///
/// GET /projects/:project_id/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(project_id): IdPath<ProjectId>,
) -> ApiResult<Json<Vec<InvitationResponse>>> {
    let service = InvitationService::new(state.service_context());
    let response = service.list_pending(project_id, auth.user_id).await?;
    Ok(Json(response))
}

/// Accept an invitation
///
/// POST /invitations/confirm
pub async fn confirm_invitation(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ConfirmInvitationRequest>,
) -> ApiResult<Json<ConfirmationResponse>> {
    let service = InvitationService::new(state.service_context());
    let response = service.confirm(request).await?;
    Ok(Json(response))
}
