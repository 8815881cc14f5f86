//! Notifications - published to external consumers after a commit
//!
//! Consumers (mailers, downstream services) receive these at-least-once with
//! no ordering guarantee across topics. `InvitationCreated` is the only
//! channel through which an invitation token leaves the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{Email, InvitationId, ProjectId, ProjectRole, UserId};

/// Notification topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "user.signed")]
    UserSigned,
    #[serde(rename = "user.refreshed")]
    UserRefreshed,
    #[serde(rename = "invite.created")]
    InviteCreated,
    #[serde(rename = "identity.invite.confirmed")]
    InviteConfirmed,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Self::UserSigned,
        Self::UserRefreshed,
        Self::InviteCreated,
        Self::InviteConfirmed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserSigned => "user.signed",
            Self::UserRefreshed => "user.refreshed",
            Self::InviteCreated => "invite.created",
            Self::InviteConfirmed => "identity.invite.confirmed",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All notifications the identity core emits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    UserSigned(SessionIssued),
    UserRefreshed(SessionRefreshed),
    InvitationCreated(InvitationCreated),
    InvitationConfirmed(InvitationConfirmed),
}

impl Notification {
    pub fn topic(&self) -> Topic {
        match self {
            Self::UserSigned(_) => Topic::UserSigned,
            Self::UserRefreshed(_) => Topic::UserRefreshed,
            Self::InvitationCreated(_) => Topic::InviteCreated,
            Self::InvitationConfirmed(_) => Topic::InviteConfirmed,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::UserSigned(e) => e.timestamp,
            Self::UserRefreshed(e) => e.timestamp,
            Self::InvitationCreated(e) => e.timestamp,
            Self::InvitationConfirmed(e) => e.timestamp,
        }
    }

    pub fn user_signed(user_id: UserId, email: Email) -> Self {
        Self::UserSigned(SessionIssued {
            user_id,
            email,
            timestamp: Utc::now(),
        })
    }

    pub fn user_refreshed(user_id: UserId) -> Self {
        Self::UserRefreshed(SessionRefreshed {
            user_id,
            timestamp: Utc::now(),
        })
    }
}

// ============================================================================
// Payloads
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIssued {
    pub user_id: UserId,
    pub email: Email,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRefreshed {
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationCreated {
    pub invitation_id: InvitationId,
    pub project_id: ProjectId,
    pub invited_by: UserId,
    pub guest_email: Email,
    pub role: ProjectRole,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationConfirmed {
    pub invitation_id: InvitationId,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub email: Email,
    pub role: ProjectRole,
    pub timestamp: DateTime<Utc>,
}
