//! Refresh credential entity <-> model mapper

use tracker_core::{CredentialId, RefreshCredential, UserId};

use crate::models::RefreshCredentialModel;

impl From<RefreshCredentialModel> for RefreshCredential {
    fn from(model: RefreshCredentialModel) -> Self {
        RefreshCredential {
            id: CredentialId::from_uuid(model.id),
            subject_id: UserId::from_uuid(model.subject_id),
            token_hash: model.token_hash,
            issued_at: model.issued_at,
            expires_at: model.expires_at,
            revoked_at: model.revoked_at,
            replaced_by: model.replaced_by.map(CredentialId::from_uuid),
        }
    }
}
