//! Invitation entity <-> model mapper

use tracker_core::{
    DomainError, Email, Invitation, InvitationId, InvitationStatus, ProjectId, ProjectRole, UserId,
};

use super::corrupt_row;
use crate::models::InvitationModel;

impl TryFrom<InvitationModel> for Invitation {
    type Error = DomainError;

    fn try_from(model: InvitationModel) -> Result<Self, Self::Error> {
        Ok(Invitation {
            id: InvitationId::from_uuid(model.id),
            token: model.token,
            project_id: ProjectId::from_uuid(model.project_id),
            invited_by: UserId::from_uuid(model.invited_by),
            guest_email: Email::parse(&model.guest_email)
                .map_err(|e| corrupt_row("invitations", e))?,
            role: model
                .role
                .parse::<ProjectRole>()
                .map_err(|e| corrupt_row("invitations", e))?,
            status: model
                .status
                .parse::<InvitationStatus>()
                .map_err(|e| corrupt_row("invitations", e))?,
            expires_at: model.expires_at,
            accepted_at: model.accepted_at,
            created_at: model.created_at,
        })
    }
}
