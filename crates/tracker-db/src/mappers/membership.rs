use tracker_core::{DomainError, Membership, ProjectId, ProjectRole, UserId};

use super::corrupt_row;
use crate::models::MembershipModel;

impl TryFrom<MembershipModel> for Membership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        Ok(Membership {
            project_id: ProjectId::from_uuid(model.project_id),
            user_id: UserId::from_uuid(model.user_id),
            role: model
                .role
                .parse::<ProjectRole>()
                .map_err(|e| corrupt_row("project_members", e))?,
            joined_at: model.joined_at,
        })
    }
}
