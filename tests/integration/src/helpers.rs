//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracker_api::{create_app, create_app_state, AppState};
use tracker_common::{AppConfig, DatabaseConfig, RateLimitConfig, TokenConfig, TokenIssuer};
use tracker_core::{MembershipPolicy, Notification, Topic};
use tracker_db::MemoryStore;
use tracker_pubsub::InMemoryNotifier;
use tracker_service::ServiceContext;

/// Signing secrets shared by every test server
pub fn test_tokens() -> TokenConfig {
    TokenConfig::with_secrets(
        "integration-access-secret-0123456789abcdef",
        "integration-refresh-secret-0123456789abcdef",
        "integration-invitation-secret-0123456789abcdef",
    )
}

/// Local profile with rate limiting loose enough for test bursts
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::local(test_tokens(), 0);
    config.rate_limit = RateLimitConfig {
        requests_per_second: 1000,
        burst: 1000,
    };
    config
}

/// Running API server backed by in-memory adapters
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Seeding access to the store behind the server
    pub store: Arc<MemoryStore>,
    /// Every notification the server published
    pub notifier: InMemoryNotifier,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with default caps and session settings
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a server with custom config; storage adapters stay in memory
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let notifier = InMemoryNotifier::new();

        let ctx = ServiceContext::builder()
            .store(Arc::clone(&store))
            .notifier(Arc::new(notifier.clone()))
            .tokens(Arc::new(TokenIssuer::new(&config.tokens)?))
            .policy(MembershipPolicy::new(config.invitations.caps()))
            .session_settings(config.session)
            .probe(store.clone())
            .build()?;

        let (addr, handle) = serve(AppState::new(ctx, config)).await?;

        Ok(Self {
            addr,
            client: client()?,
            store,
            notifier,
            _handle: handle,
        })
    }

    /// Base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Token of the most recent `invite.created` notification
    pub fn last_invitation_token(&self) -> Option<String> {
        match self.notifier.on_topic(Topic::InviteCreated).last() {
            Some(Notification::InvitationCreated(created)) => Some(created.token.clone()),
            _ => None,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// DELETE with a JSON body
    pub async fn delete<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).json(body).send().await?)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

/// Running API server wired exactly as in production
pub struct ConfiguredServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl ConfiguredServer {
    /// Start through `create_app_state`, so configured adapters are used
    pub async fn start(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let (addr, handle) = serve(state).await?;
        Ok(Self {
            addr,
            client: client()?,
            _handle: handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn serve(state: AppState) -> Result<(SocketAddr, JoinHandle<()>)> {
    let app = create_app(state);
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok((addr, handle))
}

fn client() -> Result<Client> {
    Ok(Client::builder().timeout(Duration::from_secs(10)).build()?)
}

/// Postgres settings from `DATABASE_URL`, if the environment provides one
pub fn postgres_config() -> Option<DatabaseConfig> {
    dotenvy::dotenv().ok();

    match std::env::var("DATABASE_URL") {
        Ok(url) => Some(DatabaseConfig {
            url,
            max_connections: 5,
            min_connections: 1,
            run_migrations: true,
        }),
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            None
        }
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
