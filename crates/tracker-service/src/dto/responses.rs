//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for camelCase JSON output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracker_core::{InvitationId, InvitationStatus, ProjectId, ProjectRole, UserId};

// ============================================================================
// Session Responses
// ============================================================================

/// Token pair handed out by sign-in, registration and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: UserId,
}

impl SessionResponse {
    pub fn new(access_token: String, refresh_token: String, user_id: UserId) -> Self {
        Self {
            access_token,
            refresh_token,
            user_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokedSessionsResponse {
    pub revoked: u64,
}

// ============================================================================
// Invitation Responses
// ============================================================================

/// An invitation as shown to its host; the token is never included
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: InvitationId,
    pub project_id: ProjectId,
    pub invited_by: UserId,
    pub guest_email: String,
    pub role: ProjectRole,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of confirming an invitation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResponse {
    pub status: InvitationStatus,
    pub email: String,
    pub project_id: ProjectId,
}

// ============================================================================
// Health Check Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Probe name to `healthy` / `unhealthy`
    pub checks: BTreeMap<String, String>,
}

impl ReadinessResponse {
    pub fn from_checks(results: impl IntoIterator<Item = (&'static str, bool)>) -> Self {
        let mut all_healthy = true;
        let checks = results
            .into_iter()
            .map(|(name, healthy)| {
                all_healthy &= healthy;
                let state = if healthy { "healthy" } else { "unhealthy" };
                (name.to_string(), state.to_string())
            })
            .collect();
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
