//! Membership entity - a user's role inside a project

use chrono::{DateTime, Utc};

use crate::value_objects::{ProjectId, ProjectRole, UserId};

/// Unique on `(project_id, user_id)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role: ProjectRole,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(project_id: ProjectId, user_id: UserId, role: ProjectRole) -> Self {
        Self {
            project_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == ProjectRole::Admin
    }
}
