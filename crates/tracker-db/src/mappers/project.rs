use tracker_core::{DomainError, Project, ProjectId, ProjectStatus, UserId};

use super::corrupt_row;
use crate::models::ProjectModel;

impl TryFrom<ProjectModel> for Project {
    type Error = DomainError;

    fn try_from(model: ProjectModel) -> Result<Self, Self::Error> {
        Ok(Project {
            id: ProjectId::from_uuid(model.id),
            name: model.name,
            owner_id: UserId::from_uuid(model.owner_id),
            status: model
                .status
                .parse::<ProjectStatus>()
                .map_err(|e| corrupt_row("projects", e))?,
        })
    }
}
