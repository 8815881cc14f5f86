//! PostgreSQL implementation of InvitationStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use tracker_core::{
    AcceptOutcome, DomainError, Email, Invitation, InvitationId, InvitationStatus,
    InvitationStore, Membership, ProjectId, RepoResult,
};

use crate::models::InvitationModel;

use super::error::{count_to_u64, is_unique_violation, map_db_error, map_unique_violation};

const INVITATION_COLUMNS: &str = "id, token, project_id, invited_by, guest_email, role, status, \
                                  expires_at, accepted_at, created_at";

/// PostgreSQL implementation of InvitationStore
#[derive(Clone)]
pub struct PgInvitationStore {
    pool: PgPool,
}

impl PgInvitationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationStore for PgInvitationStore {
    #[instrument(skip(self, invitation), fields(invitation_id = %invitation.id))]
    async fn insert(&self, invitation: &Invitation) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invitations (id, token, project_id, invited_by, guest_email, role,
                                     status, expires_at, accepted_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(invitation.id.into_inner())
        .bind(&invitation.token)
        .bind(invitation.project_id.into_inner())
        .bind(invitation.invited_by.into_inner())
        .bind(invitation.guest_email.as_str())
        .bind(invitation.role.as_str())
        .bind(invitation.status.as_str())
        .bind(invitation.expires_at)
        .bind(invitation.accepted_at)
        .bind(invitation.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::InvitationTokenExists))?;

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Invitation>> {
        let query = format!("SELECT {INVITATION_COLUMNS} FROM invitations WHERE token = $1");
        let result = sqlx::query_as::<_, InvitationModel>(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Invitation::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn count_pending_for_guest(
        &self,
        project_id: ProjectId,
        guest_email: &Email,
        now: DateTime<Utc>,
    ) -> RepoResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM invitations
            WHERE project_id = $1 AND guest_email = $2
              AND status = 'pending' AND expires_at > $3
            "#,
        )
        .bind(project_id.into_inner())
        .bind(guest_email.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count_to_u64(count))
    }

    #[instrument(skip(self))]
    async fn count_pending_for_project(
        &self,
        project_id: ProjectId,
        now: DateTime<Utc>,
    ) -> RepoResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM invitations
            WHERE project_id = $1 AND status = 'pending' AND expires_at > $2
            "#,
        )
        .bind(project_id.into_inner())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count_to_u64(count))
    }

    #[instrument(skip(self))]
    async fn list_pending(
        &self,
        project_id: ProjectId,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<Invitation>> {
        let query = format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations \
             WHERE project_id = $1 AND status = 'pending' AND expires_at > $2 \
             ORDER BY created_at ASC"
        );
        let results = sqlx::query_as::<_, InvitationModel>(&query)
            .bind(project_id.into_inner())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        results.into_iter().map(Invitation::try_from).collect()
    }

    #[instrument(skip(self, membership), fields(user_id = %membership.user_id))]
    async fn accept(
        &self,
        id: InvitationId,
        membership: &Membership,
        now: DateTime<Utc>,
    ) -> RepoResult<AcceptOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let flipped = sqlx::query(
            r#"
            UPDATE invitations
            SET status = $2, accepted_at = $3
            WHERE id = $1 AND status = 'pending' AND expires_at > $3
            "#,
        )
        .bind(id.into_inner())
        .bind(InvitationStatus::Accepted.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if flipped == 0 {
            debug!("invitation no longer pending or past due, acceptance rolled back");
            return Ok(AcceptOutcome::NotPending);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(membership.project_id.into_inner())
        .bind(membership.user_id.into_inner())
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            // Dropping `tx` rolls the status flip back.
            Err(e) if is_unique_violation(&e) => return Ok(AcceptOutcome::AlreadyMember),
            Err(e) => return Err(map_db_error(e)),
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(AcceptOutcome::Accepted)
    }

    #[instrument(skip(self))]
    async fn expire(&self, id: InvitationId) -> RepoResult<bool> {
        let affected = sqlx::query(
            "UPDATE invitations SET status = 'expired' WHERE id = $1 AND status = 'pending'",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        Ok(affected > 0)
    }

    #[instrument(skip(self))]
    async fn expire_overdue(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let affected = sqlx::query(
            r#"
            UPDATE invitations
            SET status = 'expired'
            WHERE status = 'pending' AND expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        Ok(affected)
    }
}
