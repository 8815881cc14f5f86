//! Who may invite whom, and under which caps
//!
//! Every check is a pure function of its inputs: the service layer loads the
//! project, the host's role and the pending counts, then asks the policy.
//! Violations carry a tagged reason so the caller can render a precise message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Project, ProjectStatus};
use crate::value_objects::{Email, ProjectRole, UserId};

/// Caps on outstanding pending invitations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationCaps {
    /// Pending invitations per guest within one project
    pub per_guest: u64,
    /// Pending invitations per project
    pub per_project: u64,
}

impl Default for InvitationCaps {
    fn default() -> Self {
        Self {
            per_guest: 3,
            per_project: 100,
        }
    }
}

/// Reason a membership decision was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("project is {} and cannot change membership", .0.as_str())]
    ProjectNotActive(ProjectStatus),

    #[error("only project owners and members may invite")]
    HostNotMember,

    #[error("a {host} cannot invite a {requested}")]
    RoleNotGrantable {
        host: ProjectRole,
        requested: ProjectRole,
    },

    #[error("cannot invite yourself")]
    SelfInvite,

    #[error("guest is already a member of this project")]
    GuestAlreadyMember,

    #[error("guest already has {cap} pending invitations")]
    GuestCapReached { cap: u64 },

    #[error("project already has {cap} pending invitations")]
    ProjectCapReached { cap: u64 },

    #[error("only project owners and admins may manage invitations")]
    NotProjectAdmin,
}

impl PolicyViolation {
    /// Stable machine-readable reason
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotActive(_) => "PROJECT_NOT_ACTIVE",
            Self::HostNotMember => "HOST_NOT_MEMBER",
            Self::RoleNotGrantable { .. } => "ROLE_NOT_GRANTABLE",
            Self::SelfInvite => "SELF_INVITE",
            Self::GuestAlreadyMember => "GUEST_ALREADY_MEMBER",
            Self::GuestCapReached { .. } => "GUEST_PENDING_CAP",
            Self::ProjectCapReached { .. } => "PROJECT_PENDING_CAP",
            Self::NotProjectAdmin => "NOT_PROJECT_ADMIN",
        }
    }
}

/// Everything needed to decide an invitation request
#[derive(Debug, Clone)]
pub struct InviteCheck<'a> {
    pub project: &'a Project,
    pub host_id: UserId,
    pub host_email: &'a Email,
    /// Host's membership role, `None` when the host is not a member
    pub host_role: Option<ProjectRole>,
    pub guest_email: &'a Email,
    pub requested_role: ProjectRole,
    pub guest_is_member: bool,
    /// Pending invitations for this guest in this project
    pub guest_pending: u64,
    /// Pending invitations in this project
    pub project_pending: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipPolicy {
    caps: InvitationCaps,
}

impl MembershipPolicy {
    pub fn new(caps: InvitationCaps) -> Self {
        Self { caps }
    }

    pub fn caps(&self) -> InvitationCaps {
        self.caps
    }

    /// Decide whether the host may issue this invitation
    pub fn check_invite(&self, check: &InviteCheck<'_>) -> Result<(), PolicyViolation> {
        self.check_membership_change(check.project.status)?;

        let effective = self.effective_role(check.project.is_owner(check.host_id), check.host_role);
        let host_role = effective.ok_or(PolicyViolation::HostNotMember)?;
        if !host_role.can_grant(check.requested_role) {
            return Err(PolicyViolation::RoleNotGrantable {
                host: host_role,
                requested: check.requested_role,
            });
        }

        if check.host_email == check.guest_email {
            return Err(PolicyViolation::SelfInvite);
        }
        if check.guest_is_member {
            return Err(PolicyViolation::GuestAlreadyMember);
        }
        if check.guest_pending >= self.caps.per_guest {
            return Err(PolicyViolation::GuestCapReached {
                cap: self.caps.per_guest,
            });
        }
        if check.project_pending >= self.caps.per_project {
            return Err(PolicyViolation::ProjectCapReached {
                cap: self.caps.per_project,
            });
        }
        Ok(())
    }

    /// Archived or suspended projects may not gain or change members
    pub fn check_membership_change(&self, status: ProjectStatus) -> Result<(), PolicyViolation> {
        match status {
            ProjectStatus::Active => Ok(()),
            other => Err(PolicyViolation::ProjectNotActive(other)),
        }
    }

    /// Listing and sweeping invitations needs owner or admin rights
    pub fn check_manage_invitations(
        &self,
        is_owner: bool,
        role: Option<ProjectRole>,
    ) -> Result<(), PolicyViolation> {
        match self.effective_role(is_owner, role) {
            Some(ProjectRole::Admin) => Ok(()),
            _ => Err(PolicyViolation::NotProjectAdmin),
        }
    }

    // The owner acts as an admin whether or not a membership row exists.
    fn effective_role(&self, is_owner: bool, role: Option<ProjectRole>) -> Option<ProjectRole> {
        if is_owner {
            Some(ProjectRole::Admin)
        } else {
            role
        }
    }
}
