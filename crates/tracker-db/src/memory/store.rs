use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracker_core::{
    AcceptOutcome, CredentialId, CredentialStore, DomainError, Email, HealthProbe, Invitation,
    InvitationId, InvitationStatus, InvitationStore, Membership, MembershipRepository, Project,
    ProjectDirectory, ProjectId, RefreshCredential, RepoResult, RotationOutcome, User,
    UserDirectory, UserId,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    user_emails: HashMap<Email, UserId>,
    credentials: HashMap<CredentialId, RefreshCredential>,
    invitations: HashMap<InvitationId, Invitation>,
    invitation_tokens: HashMap<String, InvitationId>,
    projects: HashMap<ProjectId, Project>,
    memberships: HashMap<(ProjectId, UserId), Membership>,
}

impl Tables {
    fn pending_invitations(
        &self,
        project_id: ProjectId,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = &Invitation> {
        self.invitations
            .values()
            .filter(move |inv| inv.project_id == project_id && inv.is_open(now))
    }
}

/// Shared in-memory tables; clones share state
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn guard(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DomainError::StoreUnavailable("in-memory store offline".to_string()))
        } else {
            Ok(())
        }
    }

    /// Insert a project (projects are owned outside this service)
    pub fn insert_project(&self, project: Project) {
        self.tables.lock().projects.insert(project.id, project);
    }

    /// Insert a membership directly, outside the invitation flow
    pub fn insert_membership(&self, membership: Membership) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        let key = (membership.project_id, membership.user_id);
        if tables.memberships.contains_key(&key) {
            return Err(DomainError::AlreadyMember);
        }
        tables.memberships.insert(key, membership);
        Ok(())
    }

    /// All credentials ever issued to a subject
    pub fn credentials_of(&self, subject_id: UserId) -> Vec<RefreshCredential> {
        self.tables
            .lock()
            .credentials
            .values()
            .filter(|c| c.subject_id == subject_id)
            .cloned()
            .collect()
    }

    /// Number of memberships in a project
    pub fn membership_count(&self, project_id: ProjectId) -> usize {
        self.tables
            .lock()
            .memberships
            .keys()
            .filter(|(p, _)| *p == project_id)
            .count()
    }

    /// Replace a user's global roles
    pub fn set_roles(&self, user_id: UserId, roles: Vec<String>) -> bool {
        match self.tables.lock().users.get_mut(&user_id) {
            Some(user) => {
                user.roles = roles;
                true
            }
            None => false,
        }
    }

    /// Overwrite a credential's expiry
    pub fn set_credential_expiry(&self, id: CredentialId, expires_at: DateTime<Utc>) -> bool {
        match self.tables.lock().credentials.get_mut(&id) {
            Some(cred) => {
                cred.expires_at = expires_at;
                true
            }
            None => false,
        }
    }

    /// Overwrite an invitation's expiry
    pub fn set_invitation_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> bool {
        let mut tables = self.tables.lock();
        let Some(id) = tables.invitation_tokens.get(token).copied() else {
            return false;
        };
        match tables.invitations.get_mut(&id) {
            Some(inv) => {
                inv.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        self.guard()?;
        Ok(self.tables.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RepoResult<Option<User>> {
        self.guard()?;
        let tables = self.tables.lock();
        Ok(tables
            .user_emails
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        self.guard()?;
        let mut tables = self.tables.lock();
        if tables.user_emails.contains_key(&user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        tables.user_emails.insert(user.email.clone(), user.id);
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_or_provision(&self, email: &Email) -> RepoResult<User> {
        self.guard()?;
        let mut tables = self.tables.lock();
        if let Some(user) = tables.user_emails.get(email).and_then(|id| tables.users.get(id)) {
            return Ok(user.clone());
        }
        let user = User::provisioned(email.clone());
        tables.user_emails.insert(email.clone(), user.id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert(&self, credential: &RefreshCredential) -> RepoResult<()> {
        self.guard()?;
        let mut tables = self.tables.lock();
        if tables.credentials.contains_key(&credential.id) {
            return Err(DomainError::DatabaseError(format!(
                "duplicate credential id {}",
                credential.id
            )));
        }
        tables.credentials.insert(credential.id, credential.clone());
        Ok(())
    }

    async fn find(&self, id: CredentialId) -> RepoResult<Option<RefreshCredential>> {
        self.guard()?;
        Ok(self.tables.lock().credentials.get(&id).cloned())
    }

    async fn rotate(
        &self,
        old_id: CredentialId,
        expected_hash: &str,
        successor: &RefreshCredential,
        now: DateTime<Utc>,
    ) -> RepoResult<RotationOutcome> {
        self.guard()?;
        let mut tables = self.tables.lock();
        if tables.credentials.contains_key(&successor.id) {
            return Err(DomainError::DatabaseError(format!(
                "duplicate credential id {}",
                successor.id
            )));
        }
        let Some(old) = tables.credentials.get_mut(&old_id) else {
            return Ok(RotationOutcome::Stale);
        };
        if !old.is_usable(now) || old.token_hash != expected_hash {
            return Ok(RotationOutcome::Stale);
        }
        old.revoke(now, Some(successor.id));
        tables.credentials.insert(successor.id, successor.clone());
        Ok(RotationOutcome::Rotated)
    }

    async fn revoke(&self, id: CredentialId, now: DateTime<Utc>) -> RepoResult<bool> {
        self.guard()?;
        let mut tables = self.tables.lock();
        match tables.credentials.get_mut(&id) {
            Some(cred) if !cred.is_revoked() => {
                cred.revoke(now, None);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_subject(
        &self,
        subject_id: UserId,
        now: DateTime<Utc>,
    ) -> RepoResult<u64> {
        self.guard()?;
        let mut tables = self.tables.lock();
        let mut revoked = 0;
        for cred in tables
            .credentials
            .values_mut()
            .filter(|c| c.subject_id == subject_id && !c.is_revoked())
        {
            cred.revoke(now, None);
            revoked += 1;
        }
        Ok(revoked)
    }
}

#[async_trait]
impl InvitationStore for MemoryStore {
    async fn insert(&self, invitation: &Invitation) -> RepoResult<()> {
        self.guard()?;
        let mut tables = self.tables.lock();
        if tables.invitation_tokens.contains_key(&invitation.token) {
            return Err(DomainError::InvitationTokenExists);
        }
        tables
            .invitation_tokens
            .insert(invitation.token.clone(), invitation.id);
        tables.invitations.insert(invitation.id, invitation.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<Invitation>> {
        self.guard()?;
        let tables = self.tables.lock();
        Ok(tables
            .invitation_tokens
            .get(token)
            .and_then(|id| tables.invitations.get(id))
            .cloned())
    }

    async fn count_pending_for_guest(
        &self,
        project_id: ProjectId,
        guest_email: &Email,
        now: DateTime<Utc>,
    ) -> RepoResult<u64> {
        self.guard()?;
        let tables = self.tables.lock();
        let count = tables
            .pending_invitations(project_id, now)
            .filter(|inv| inv.is_for(guest_email))
            .count();
        Ok(count as u64)
    }

    async fn count_pending_for_project(
        &self,
        project_id: ProjectId,
        now: DateTime<Utc>,
    ) -> RepoResult<u64> {
        self.guard()?;
        let tables = self.tables.lock();
        Ok(tables.pending_invitations(project_id, now).count() as u64)
    }

    async fn list_pending(
        &self,
        project_id: ProjectId,
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<Invitation>> {
        self.guard()?;
        let tables = self.tables.lock();
        let mut pending: Vec<Invitation> =
            tables.pending_invitations(project_id, now).cloned().collect();
        pending.sort_by_key(|inv| inv.created_at);
        Ok(pending)
    }

    async fn accept(
        &self,
        id: InvitationId,
        membership: &Membership,
        now: DateTime<Utc>,
    ) -> RepoResult<AcceptOutcome> {
        self.guard()?;
        let mut tables = self.tables.lock();
        let pending = tables
            .invitations
            .get(&id)
            .is_some_and(|inv| inv.status == InvitationStatus::Pending && !inv.is_past_due(now));
        if !pending {
            return Ok(AcceptOutcome::NotPending);
        }
        let key = (membership.project_id, membership.user_id);
        if tables.memberships.contains_key(&key) {
            return Ok(AcceptOutcome::AlreadyMember);
        }
        if let Some(inv) = tables.invitations.get_mut(&id) {
            inv.accept(now);
        }
        tables.memberships.insert(key, membership.clone());
        Ok(AcceptOutcome::Accepted)
    }

    async fn expire(&self, id: InvitationId) -> RepoResult<bool> {
        self.guard()?;
        let mut tables = self.tables.lock();
        Ok(tables
            .invitations
            .get_mut(&id)
            .is_some_and(Invitation::expire))
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        self.guard()?;
        let mut tables = self.tables.lock();
        let mut expired = 0;
        for inv in tables
            .invitations
            .values_mut()
            .filter(|inv| inv.is_pending() && inv.is_past_due(now))
        {
            inv.expire();
            expired += 1;
        }
        Ok(expired)
    }
}

#[async_trait]
impl ProjectDirectory for MemoryStore {
    async fn find_by_id(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        self.guard()?;
        Ok(self.tables.lock().projects.get(&id).cloned())
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find(&self, project_id: ProjectId, user_id: UserId) -> RepoResult<Option<Membership>> {
        self.guard()?;
        Ok(self
            .tables
            .lock()
            .memberships
            .get(&(project_id, user_id))
            .cloned())
    }

    async fn list_by_project(&self, project_id: ProjectId) -> RepoResult<Vec<Membership>> {
        self.guard()?;
        let tables = self.tables.lock();
        let mut members: Vec<Membership> = tables
            .memberships
            .values()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }
}

#[async_trait]
impl HealthProbe for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn check(&self) -> bool {
        self.guard().is_ok()
    }
}
