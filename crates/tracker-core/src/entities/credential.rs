//! Refresh credential entity - one outstanding refresh token

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::{CredentialId, UserId};

/// Persisted record of an issued refresh token
///
/// Only the SHA-256 fingerprint of the signed token is kept. Rows are never
/// updated except to set `revoked_at` and `replaced_by`; rotation inserts a
/// successor instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshCredential {
    pub id: CredentialId,
    pub subject_id: UserId,
    pub token_hash: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub replaced_by: Option<CredentialId>,
}

impl RefreshCredential {
    pub fn new(
        id: CredentialId,
        subject_id: UserId,
        token_hash: String,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id,
            subject_id,
            token_hash,
            issued_at,
            expires_at: issued_at + ttl,
            revoked_at: None,
            replaced_by: None,
        }
    }

    #[inline]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Usable iff not revoked and not yet expired
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }

    /// True when this credential was retired by a rotation
    #[inline]
    pub fn was_rotated(&self) -> bool {
        self.replaced_by.is_some()
    }

    /// Mark revoked; a no-op on an already revoked credential
    pub fn revoke(&mut self, at: DateTime<Utc>, successor: Option<CredentialId>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(at);
            self.replaced_by = successor;
        }
    }
}
