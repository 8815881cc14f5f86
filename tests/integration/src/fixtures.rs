//! Test fixtures and data generators
//!
//! Wire shapes of the API (camelCase JSON) and seeding helpers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracker_core::{Membership, Project, ProjectId, ProjectRole, UserId};
use tracker_db::MemoryStore;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Password that passes the strength rules
pub const STRONG_PASSWORD: &str = "TestPass123!";

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique email address for one test
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}{}@example.com", unique_suffix())
}

#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn unique() -> Self {
        Self {
            email: unique_email("user"),
            password: STRONG_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    pub refresh_token: String,
}

impl RefreshBody {
    pub fn new(refresh_token: &str) -> Self {
        Self {
            refresh_token: refresh_token.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
}

impl SessionBody {
    pub fn user_id(&self) -> UserId {
        self.user_id.parse().expect("userId is a UUID")
    }
}

#[derive(Debug, Deserialize)]
pub struct RevokedBody {
    pub revoked: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteBody {
    pub guest_email: String,
    pub role: String,
}

impl InviteBody {
    pub fn member(guest_email: &str) -> Self {
        Self {
            guest_email: guest_email.to_string(),
            role: "member".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBody {
    pub token: String,
    pub guest_email: String,
}

impl ConfirmBody {
    pub fn new(token: &str, guest_email: &str) -> Self {
        Self {
            token: token.to_string(),
            guest_email: guest_email.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationBody {
    pub id: String,
    pub project_id: String,
    pub invited_by: String,
    pub guest_email: String,
    pub role: String,
    pub status: String,
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationBody {
    pub status: String,
    pub email: String,
    pub project_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Insert an active project owned by `owner`
pub fn seed_project(store: &MemoryStore, owner: UserId) -> ProjectId {
    let project = Project::new(format!("Project {}", unique_suffix()), owner);
    let id = project.id;
    store.insert_project(project);
    id
}

/// Add `user` to `project` with `role`
pub fn seed_member(store: &MemoryStore, project: ProjectId, user: UserId, role: ProjectRole) {
    store
        .insert_membership(Membership::new(project, user, role))
        .expect("membership is new");
}
