//! Refresh credential database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for refresh_credentials table
#[derive(Debug, Clone, FromRow)]
pub struct RefreshCredentialModel {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub token_hash: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub replaced_by: Option<Uuid>,
}
