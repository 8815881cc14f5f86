//! User entity <-> model mapper

use tracker_core::{DomainError, Email, User, UserId};

use super::corrupt_row;
use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from_uuid(model.id),
            email: Email::parse(&model.email).map_err(|e| corrupt_row("users", e))?,
            password_hash: model.password_hash,
            roles: model.roles,
            verified: model.verified,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
