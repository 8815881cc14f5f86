//! Project entity - the tenant a membership belongs to

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::value_objects::{ProjectId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
    Suspended,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Suspended => "suspended",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "suspended" => Ok(Self::Suspended),
            other => Err(format!("unknown project status: {other}")),
        }
    }
}

/// Project entity. Read-only for the identity core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub owner_id: UserId,
    pub status: ProjectStatus,
}

impl Project {
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            owner_id,
            status: ProjectStatus::Active,
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}
