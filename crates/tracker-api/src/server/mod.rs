//! Server setup and initialization
//!
//! Picks the storage and notification adapters from configuration, builds the
//! router and runs it until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracker_common::{AppConfig, AppError, TokenIssuer};
use tracker_core::MembershipPolicy;
use tracker_db::{
    create_pool, run_migrations, DatabaseConfig, MemoryStore, PgCredentialStore,
    PgHealthProbe, PgInvitationStore, PgMembershipRepository, PgProjectDirectory,
    PgUserDirectory,
};
use tracker_pubsub::{LoggingNotifier, RedisHealthProbe, RedisNotifier, RedisPool};
use tracker_service::{InvitationService, ServiceContextBuilder};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// How often overdue pending invitations are flipped to expired
pub const INVITATION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let api = apply_middleware(create_router(), state.config());
    api.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let tokens = Arc::new(TokenIssuer::new(&config.tokens)?);

    let builder = ServiceContextBuilder::new()
        .tokens(tokens)
        .policy(MembershipPolicy::new(config.invitations.caps()))
        .session_settings(config.session);

    let builder = match &config.database {
        Some(database) => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&DatabaseConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            if database.run_migrations {
                run_migrations(&pool)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            info!("PostgreSQL connection established");

            builder
                .users(Arc::new(PgUserDirectory::new(pool.clone())))
                .credentials(Arc::new(PgCredentialStore::new(pool.clone())))
                .invitations(Arc::new(PgInvitationStore::new(pool.clone())))
                .projects(Arc::new(PgProjectDirectory::new(pool.clone())))
                .memberships(Arc::new(PgMembershipRepository::new(pool.clone())))
                .probe(Arc::new(PgHealthProbe::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set, state is kept in memory and lost on restart");
            let store = Arc::new(MemoryStore::new());
            builder.store(Arc::clone(&store)).probe(store)
        }
    };

    let builder = match &config.redis {
        Some(redis) => {
            info!("Connecting to Redis...");
            let pool = RedisPool::from_config(redis).map_err(|e| AppError::Cache(e.to_string()))?;
            builder
                .notifier(Arc::new(RedisNotifier::new(pool.clone())))
                .probe(Arc::new(RedisHealthProbe::new(pool)))
        }
        None => {
            warn!("REDIS_URL not set, notifications are only logged");
            builder.notifier(Arc::new(LoggingNotifier))
        }
    };

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Periodically expire overdue invitations in the background
pub fn spawn_invitation_sweeper(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match InvitationService::new(state.service_context())
                .expire_overdue()
                .await
            {
                Ok(0) => {}
                Ok(expired) => info!(expired, "Expired overdue invitations"),
                Err(e) => warn!(error = %e, "Invitation sweep failed"),
            }
        }
    })
}

/// Run the HTTP server until ctrl-c
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {}", e)))?;

    let state = create_app_state(config).await?;
    let sweeper = spawn_invitation_sweeper(state.clone(), INVITATION_SWEEP_INTERVAL);

    let result = run_server(create_app(state), addr).await;
    sweeper.abort();
    result
}
