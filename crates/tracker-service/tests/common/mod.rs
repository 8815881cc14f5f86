//! Shared fixtures for service tests: in-memory stores and a recording notifier

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use tracker_common::{hash_password, SessionSettings, TokenConfig, TokenIssuer};
use tracker_core::{
    Email, InvitationCaps, Membership, MembershipPolicy, Notification, Project, ProjectRole,
    Topic, User, UserDirectory,
};
use tracker_db::MemoryStore;
use tracker_pubsub::InMemoryNotifier;
use tracker_service::ServiceContext;

pub const PASSWORD: &str = "secret1";

pub fn token_config() -> TokenConfig {
    TokenConfig::with_secrets(
        "access-secret-for-tests-0123456789abcdef",
        "refresh-secret-for-tests-0123456789abcdef",
        "invitation-secret-for-tests-0123456789abcdef",
    )
}

// Argon2 is slow in debug builds, so every seeded user shares one hash.
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap()).clone()
}

pub fn email(raw: &str) -> Email {
    Email::parse(raw).unwrap()
}

pub struct Harness {
    pub ctx: ServiceContext,
    pub store: Arc<MemoryStore>,
    pub notifier: InMemoryNotifier,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(SessionSettings::default(), InvitationCaps::default(), token_config())
    }

    pub fn with_session(settings: SessionSettings) -> Self {
        Self::build(settings, InvitationCaps::default(), token_config())
    }

    pub fn with_caps(caps: InvitationCaps) -> Self {
        Self::build(SessionSettings::default(), caps, token_config())
    }

    pub fn with_tokens(config: TokenConfig) -> Self {
        Self::build(SessionSettings::default(), InvitationCaps::default(), config)
    }

    fn build(settings: SessionSettings, caps: InvitationCaps, tokens: TokenConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = InMemoryNotifier::new();
        let ctx = ServiceContext::builder()
            .store(store.clone())
            .notifier(Arc::new(notifier.clone()))
            .tokens(Arc::new(TokenIssuer::new(&tokens).unwrap()))
            .policy(MembershipPolicy::new(caps))
            .session_settings(settings)
            .probe(store.clone())
            .build()
            .unwrap();
        Self {
            ctx,
            store,
            notifier,
        }
    }

    /// Seed a user whose password is `PASSWORD`
    pub async fn seed_user(&self, raw_email: &str) -> User {
        let user = User::new(email(raw_email), password_hash());
        UserDirectory::create(self.store.as_ref(), &user).await.unwrap();
        user
    }

    /// Seed an active project owned by `owner`
    pub fn seed_project(&self, name: &str, owner: &User) -> Project {
        let project = Project::new(name, owner.id);
        self.store.insert_project(project.clone());
        project
    }

    pub fn add_member(&self, project: &Project, user: &User, role: ProjectRole) {
        self.store
            .insert_membership(Membership::new(project.id, user.id, role))
            .unwrap();
    }

    /// Token of the most recent `invite.created` notification
    pub fn last_invitation_token(&self) -> String {
        match self.notifier.on_topic(Topic::InviteCreated).last() {
            Some(Notification::InvitationCreated(created)) => created.token.clone(),
            other => panic!("no invitation notification: {other:?}"),
        }
    }
}
