//! Route definitions

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{health, invitations, session, users};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(session_routes())
        .merge(user_routes())
        .merge(invitation_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/session", post(session::sign_in).delete(session::sign_out))
        .route("/session/refresh", post(session::refresh))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::register))
        .route("/users/me/sessions", delete(users::sign_out_everywhere))
}

fn invitation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/:project_id/invitations",
            post(invitations::create_invitation).get(invitations::list_invitations),
        )
        .route("/invitations/confirm", post(invitations::confirm_invitation))
}
