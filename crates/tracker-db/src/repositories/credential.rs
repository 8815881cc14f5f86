//! PostgreSQL implementation of CredentialStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use tracker_core::{
    CredentialId, CredentialStore, RefreshCredential, RepoResult, RotationOutcome, UserId,
};

use crate::models::RefreshCredentialModel;

use super::error::map_db_error;

/// PostgreSQL implementation of CredentialStore
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_in(
        tx: &mut Transaction<'_, Postgres>,
        credential: &RefreshCredential,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_credentials (id, subject_id, token_hash, issued_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(credential.id.into_inner())
        .bind(credential.subject_id.into_inner())
        .bind(&credential.token_hash)
        .bind(credential.issued_at)
        .bind(credential.expires_at)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    #[instrument(skip(self, credential), fields(jti = %credential.id))]
    async fn insert(&self, credential: &RefreshCredential) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        Self::insert_in(&mut tx, credential).await?;
        tx.commit().await.map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find(&self, id: CredentialId) -> RepoResult<Option<RefreshCredential>> {
        let result = sqlx::query_as::<_, RefreshCredentialModel>(
            r#"
            SELECT id, subject_id, token_hash, issued_at, expires_at, revoked_at, replaced_by
            FROM refresh_credentials
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RefreshCredential::from))
    }

    #[instrument(skip(self, expected_hash, successor), fields(successor = %successor.id))]
    async fn rotate(
        &self,
        old_id: CredentialId,
        expected_hash: &str,
        successor: &RefreshCredential,
        now: DateTime<Utc>,
    ) -> RepoResult<RotationOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock serialises racing rotations; losers re-check the predicate
        // after the winner commits and match zero rows.
        let revoked = sqlx::query(
            r#"
            UPDATE refresh_credentials
            SET revoked_at = $2, replaced_by = $3
            WHERE id = $1
              AND token_hash = $4
              AND revoked_at IS NULL
              AND expires_at > $2
            "#,
        )
        .bind(old_id.into_inner())
        .bind(now)
        .bind(successor.id.into_inner())
        .bind(expected_hash)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if revoked == 0 {
            debug!("credential no longer usable, rotation rolled back");
            return Ok(RotationOutcome::Stale);
        }

        Self::insert_in(&mut tx, successor).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(RotationOutcome::Rotated)
    }

    #[instrument(skip(self))]
    async fn revoke(&self, id: CredentialId, now: DateTime<Utc>) -> RepoResult<bool> {
        let affected = sqlx::query(
            "UPDATE refresh_credentials SET revoked_at = $2 WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id.into_inner())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        Ok(affected > 0)
    }

    #[instrument(skip(self))]
    async fn revoke_all_for_subject(
        &self,
        subject_id: UserId,
        now: DateTime<Utc>,
    ) -> RepoResult<u64> {
        let affected = sqlx::query(
            r#"
            UPDATE refresh_credentials
            SET revoked_at = $2
            WHERE subject_id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(subject_id.into_inner())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        Ok(affected)
    }
}
