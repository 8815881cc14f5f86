//! Entity to DTO conversions

use tracker_core::Invitation;

use super::responses::InvitationResponse;

impl From<&Invitation> for InvitationResponse {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id,
            project_id: invitation.project_id,
            invited_by: invitation.invited_by,
            guest_email: invitation.guest_email.to_string(),
            role: invitation.role,
            status: invitation.status,
            expires_at: invitation.expires_at,
            created_at: invitation.created_at,
        }
    }
}
