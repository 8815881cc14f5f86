//! Invitation database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for invitations table
#[derive(Debug, Clone, FromRow)]
pub struct InvitationModel {
    pub id: Uuid,
    pub token: String,
    pub project_id: Uuid,
    pub invited_by: Uuid,
    pub guest_email: String,
    pub role: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
