//! Invitation entity - a single-use offer of project membership

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::{Email, InvitationId, ProjectId, ProjectRole, UserId};

/// Invitation lifecycle state
///
/// Transitions only go `Pending -> Accepted` or `Pending -> Expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

impl InvitationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Expired => "expired",
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn can_transition_to(self, next: InvitationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted) | (Self::Pending, Self::Expired)
        )
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown invitation status: {other}")),
        }
    }
}

/// Invitation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub id: InvitationId,
    pub token: String,
    pub project_id: ProjectId,
    pub invited_by: UserId,
    pub guest_email: Email,
    pub role: ProjectRole,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Create a pending invitation valid for `ttl`
    pub fn new(
        token: String,
        project_id: ProjectId,
        invited_by: UserId,
        guest_email: Email,
        role: ProjectRole,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: InvitationId::new(),
            token,
            project_id,
            invited_by,
            guest_email,
            role,
            status: InvitationStatus::Pending,
            expires_at: now + ttl,
            accepted_at: None,
            created_at: now,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Pending and not yet past its expiry
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && !self.is_past_due(now)
    }

    /// Addressed to this guest
    pub fn is_for(&self, email: &Email) -> bool {
        &self.guest_email == email
    }

    /// Flip to accepted. Returns false if the invitation is no longer pending.
    pub fn accept(&mut self, at: DateTime<Utc>) -> bool {
        if !self.status.can_transition_to(InvitationStatus::Accepted) {
            return false;
        }
        self.status = InvitationStatus::Accepted;
        self.accepted_at = Some(at);
        true
    }

    /// Flip to expired. Returns false if the invitation is no longer pending.
    pub fn expire(&mut self) -> bool {
        if !self.status.can_transition_to(InvitationStatus::Expired) {
            return false;
        }
        self.status = InvitationStatus::Expired;
        true
    }
}
