//! Invitation service
//!
//! Hosts invite guests by email; the signed token only ever leaves the service
//! through the `invite.created` notification. Confirming an invitation flips it
//! to accepted and creates the membership in one atomic store operation.

use chrono::Utc;
use tracing::{info, instrument, warn};
use tracker_core::{
    AcceptOutcome, DomainError, Invitation, InvitationConfirmed, InvitationCreated,
    InvitationStatus, InviteCheck, Membership, Notification, Project, ProjectId, UserId,
};

use crate::dto::{
    ConfirmInvitationRequest, ConfirmationResponse, CreateInvitationRequest, InvitationResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::session::parse_email;

pub struct InvitationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InvitationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue an invitation on behalf of `host_id`
    #[instrument(skip(self, request), fields(guest_email = %request.guest_email, role = %request.role))]
    pub async fn invite(
        &self,
        project_id: ProjectId,
        host_id: UserId,
        request: CreateInvitationRequest,
    ) -> ServiceResult<InvitationResponse> {
        let guest_email = parse_email(&request.guest_email)?;
        let project = self.load_project(project_id).await?;

        let host = self
            .ctx
            .users()
            .find_by_id(host_id)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("unknown user"))?;
        let host_role = self
            .ctx
            .memberships()
            .find(project_id, host_id)
            .await?
            .map(|m| m.role);

        let guest_is_member = match self.ctx.users().find_by_email(&guest_email).await? {
            Some(guest) => self
                .ctx
                .memberships()
                .find(project_id, guest.id)
                .await?
                .is_some(),
            None => false,
        };

        let now = Utc::now();
        let guest_pending = self
            .ctx
            .invitations()
            .count_pending_for_guest(project_id, &guest_email, now)
            .await?;
        let project_pending = self
            .ctx
            .invitations()
            .count_pending_for_project(project_id, now)
            .await?;

        let check = InviteCheck {
            project: &project,
            host_id,
            host_email: &host.email,
            host_role,
            guest_email: &guest_email,
            requested_role: request.role,
            guest_is_member,
            guest_pending,
            project_pending,
        };
        if let Err(violation) = self.ctx.policy().check_invite(&check) {
            warn!(project_id = %project_id, host_id = %host_id, reason = violation.code(), "Invitation refused");
            return Err(violation.into());
        }

        let issued = self.ctx.tokens().issue_invitation(&guest_email, host_id)?;
        let invitation = Invitation::new(
            issued.token,
            project_id,
            host_id,
            guest_email,
            request.role,
            issued.expires_at - issued.issued_at,
        );
        self.ctx.invitations().insert(&invitation).await?;

        info!(
            invitation_id = %invitation.id,
            project_id = %project_id,
            "Invitation created"
        );

        self.ctx
            .publish(Notification::InvitationCreated(InvitationCreated {
                invitation_id: invitation.id,
                project_id,
                invited_by: host_id,
                guest_email: invitation.guest_email.clone(),
                role: invitation.role,
                token: invitation.token.clone(),
                expires_at: invitation.expires_at,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(InvitationResponse::from(&invitation))
    }

    /// Accept an invitation as `guest_email`, provisioning the user if needed
    #[instrument(skip(self, request), fields(guest_email = %request.guest_email))]
    pub async fn confirm(
        &self,
        request: ConfirmInvitationRequest,
    ) -> ServiceResult<ConfirmationResponse> {
        let guest_email = parse_email(&request.guest_email)?;

        // A token presented by the wrong guest is indistinguishable from an unknown one
        let invitation = self
            .ctx
            .invitations()
            .find_by_token(&request.token)
            .await?
            .filter(|inv| inv.is_for(&guest_email))
            .ok_or(DomainError::InvitationNotFound)?;

        let user = self.ctx.users().find_or_provision(&guest_email).await?;
        let project = self.load_project(invitation.project_id).await?;
        self.ctx.policy().check_membership_change(project.status)?;

        if self
            .ctx
            .memberships()
            .find(project.id, user.id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyMember.into());
        }

        if !invitation.is_pending() {
            return Err(DomainError::InvitationAlreadyUsed.into());
        }

        let now = Utc::now();
        if invitation.is_past_due(now) {
            self.ctx.invitations().expire(invitation.id).await?;
            info!(invitation_id = %invitation.id, "Invitation expired on confirm");
            return Err(DomainError::InvitationExpired.into());
        }

        let membership = Membership::new(project.id, user.id, invitation.role);
        match self
            .ctx
            .invitations()
            .accept(invitation.id, &membership, now)
            .await?
        {
            AcceptOutcome::Accepted => {}
            AcceptOutcome::NotPending => return Err(DomainError::InvitationAlreadyUsed.into()),
            AcceptOutcome::AlreadyMember => return Err(DomainError::AlreadyMember.into()),
        }

        info!(
            invitation_id = %invitation.id,
            project_id = %project.id,
            user_id = %user.id,
            "Invitation accepted"
        );

        self.ctx
            .publish(Notification::InvitationConfirmed(InvitationConfirmed {
                invitation_id: invitation.id,
                project_id: project.id,
                user_id: user.id,
                email: guest_email.clone(),
                role: invitation.role,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(ConfirmationResponse {
            status: InvitationStatus::Accepted,
            email: guest_email.to_string(),
            project_id: project.id,
        })
    }

    /// Pending, unexpired invitations of a project
    #[instrument(skip(self))]
    pub async fn list_pending(
        &self,
        project_id: ProjectId,
        actor_id: UserId,
    ) -> ServiceResult<Vec<InvitationResponse>> {
        let project = self.load_project(project_id).await?;
        let role = self
            .ctx
            .memberships()
            .find(project_id, actor_id)
            .await?
            .map(|m| m.role);
        self.ctx
            .policy()
            .check_manage_invitations(project.is_owner(actor_id), role)?;

        let pending = self
            .ctx
            .invitations()
            .list_pending(project_id, Utc::now())
            .await?;
        Ok(pending.iter().map(InvitationResponse::from).collect())
    }

    /// Flip every overdue pending invitation to expired
    #[instrument(skip(self))]
    pub async fn expire_overdue(&self) -> ServiceResult<u64> {
        let expired = self.ctx.invitations().expire_overdue(Utc::now()).await?;
        if expired > 0 {
            info!(expired, "Expired overdue invitations");
        }
        Ok(expired)
    }

    async fn load_project(&self, project_id: ProjectId) -> ServiceResult<Project> {
        Ok(self
            .ctx
            .projects()
            .find_by_id(project_id)
            .await?
            .ok_or(DomainError::ProjectNotFound(project_id))?)
    }
}
