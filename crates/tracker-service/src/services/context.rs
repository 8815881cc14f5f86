//! Service context - dependency container for services
//!
//! Holds the store ports, the notifier, token and password services and the
//! membership policy. Every port is a trait object so the same services run
//! over Postgres or the in-memory store.

use std::sync::Arc;

use tracker_common::{PasswordService, SessionSettings, TokenIssuer};
use tracker_core::{
    CredentialStore, HealthProbe, InvitationStore, MembershipPolicy, MembershipRepository,
    NoopNotifier, Notification, Notifier, ProjectDirectory, UserDirectory,
};

use super::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct ServiceContext {
    // Stores
    users: Arc<dyn UserDirectory>,
    credentials: Arc<dyn CredentialStore>,
    invitations: Arc<dyn InvitationStore>,
    projects: Arc<dyn ProjectDirectory>,
    memberships: Arc<dyn MembershipRepository>,

    // Outbound
    notifier: Arc<dyn Notifier>,

    // Services
    tokens: Arc<TokenIssuer>,
    passwords: PasswordService,
    policy: MembershipPolicy,
    session: SessionSettings,

    probes: Vec<Arc<dyn HealthProbe>>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Stores ===

    pub fn users(&self) -> &dyn UserDirectory {
        self.users.as_ref()
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    pub fn invitations(&self) -> &dyn InvitationStore {
        self.invitations.as_ref()
    }

    pub fn projects(&self) -> &dyn ProjectDirectory {
        self.projects.as_ref()
    }

    pub fn memberships(&self) -> &dyn MembershipRepository {
        self.memberships.as_ref()
    }

    // === Services ===

    pub fn tokens(&self) -> &TokenIssuer {
        self.tokens.as_ref()
    }

    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }

    pub fn policy(&self) -> &MembershipPolicy {
        &self.policy
    }

    pub fn session_settings(&self) -> SessionSettings {
        self.session
    }

    pub fn probes(&self) -> &[Arc<dyn HealthProbe>] {
        &self.probes
    }

    /// Publish after commit; delivery failures are logged and swallowed
    pub async fn publish(&self, notification: Notification) {
        let topic = notification.topic();
        if let Err(e) = self.notifier.notify(&notification).await {
            tracing::warn!(topic = %topic, error = %e, "Failed to publish notification");
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("stores", &"...")
            .field("policy", &self.policy)
            .field("session", &self.session)
            .field("probes", &self.probes.len())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    users: Option<Arc<dyn UserDirectory>>,
    credentials: Option<Arc<dyn CredentialStore>>,
    invitations: Option<Arc<dyn InvitationStore>>,
    projects: Option<Arc<dyn ProjectDirectory>>,
    memberships: Option<Arc<dyn MembershipRepository>>,
    notifier: Option<Arc<dyn Notifier>>,
    tokens: Option<Arc<TokenIssuer>>,
    policy: MembershipPolicy,
    session: SessionSettings,
    probes: Vec<Arc<dyn HealthProbe>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one adapter for every store port
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: UserDirectory
            + CredentialStore
            + InvitationStore
            + ProjectDirectory
            + MembershipRepository
            + 'static,
    {
        self.users(store.clone())
            .credentials(store.clone())
            .invitations(store.clone())
            .projects(store.clone())
            .memberships(store)
    }

    pub fn users(mut self, repo: Arc<dyn UserDirectory>) -> Self {
        self.users = Some(repo);
        self
    }

    pub fn credentials(mut self, repo: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(repo);
        self
    }

    pub fn invitations(mut self, repo: Arc<dyn InvitationStore>) -> Self {
        self.invitations = Some(repo);
        self
    }

    pub fn projects(mut self, repo: Arc<dyn ProjectDirectory>) -> Self {
        self.projects = Some(repo);
        self
    }

    pub fn memberships(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.memberships = Some(repo);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn tokens(mut self, tokens: Arc<TokenIssuer>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn policy(mut self, policy: MembershipPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn session_settings(mut self, session: SessionSettings) -> Self {
        self.session = session;
        self
    }

    pub fn probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if a store or the token issuer is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext {
            users: required(self.users, "users")?,
            credentials: required(self.credentials, "credentials")?,
            invitations: required(self.invitations, "invitations")?,
            projects: required(self.projects, "projects")?,
            memberships: required(self.memberships, "memberships")?,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(NoopNotifier)),
            tokens: required(self.tokens, "tokens")?,
            passwords: PasswordService::new(),
            policy: self.policy,
            session: self.session,
            probes: self.probes,
        })
    }
}
