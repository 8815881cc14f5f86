//! PostgreSQL implementation of UserDirectory

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tracker_core::{DomainError, Email, RepoResult, User, UserDirectory, UserId};

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation};

const USER_COLUMNS: &str =
    "id, email, password_hash, roles, verified, created_at, updated_at";

/// PostgreSQL implementation of UserDirectory
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace a user's global roles
    #[instrument(skip(self))]
    pub async fn set_roles(&self, id: UserId, roles: &[String]) -> RepoResult<()> {
        sqlx::query("UPDATE users SET roles = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.into_inner())
            .bind(roles)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let result = sqlx::query_as::<_, UserModel>(&query)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &Email) -> RepoResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let result = sqlx::query_as::<_, UserModel>(&query)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, roles, verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.into_inner())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_deref())
        .bind(&user.roles)
        .bind(user.verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_or_provision(&self, email: &Email) -> RepoResult<User> {
        let candidate = User::provisioned(email.clone());

        // A concurrent provisioner may win the insert; the SELECT then sees its row.
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, roles, verified, created_at, updated_at)
            VALUES ($1, $2, NULL, '{}', TRUE, $3, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(candidate.id.into_inner())
        .bind(email.as_str())
        .bind(candidate.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.to_string()))
    }
}
