//! API integration tests
//!
//! Every test boots the full router on an ephemeral port with in-memory
//! adapters. The `test_postgres_*` tests additionally need DATABASE_URL.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use chrono::{Duration, Utc};
use integration_tests::*;
use reqwest::StatusCode;
use serde_json::Value;
use tracker_common::{RateLimitConfig, TokenIssuer};
use tracker_core::{Project, ProjectRole, ProjectStatus};

async fn register(server: &TestServer) -> (Credentials, SessionBody) {
    let credentials = Credentials::unique();
    let response = server.post("/users", &credentials).await.unwrap();
    let session = assert_json(response, StatusCode::CREATED).await.unwrap();
    (credentials, session)
}

async fn error_of(response: reqwest::Response, status: StatusCode) -> ErrorDetail {
    let body: ErrorBody = assert_json(response, status).await.unwrap();
    body.error
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_readiness_reports_store_outage() {
    let server = TestServer::start().await.unwrap();
    server.store.set_unavailable(true);

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
    assert_eq!(body["checks"]["memory"], "unhealthy");
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_register_and_duplicate() {
    let server = TestServer::start().await.unwrap();
    let (credentials, session) = register(&server).await;
    assert!(!session.access_token.is_empty());
    assert!(!session.refresh_token.is_empty());

    let response = server.post("/users", &credentials).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let server = TestServer::start().await.unwrap();
    let credentials = Credentials {
        email: unique_email("weak"),
        password: "alllowercase".to_string(),
    };

    let response = server.post("/users", &credentials).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_sign_in_and_refresh_rotation() {
    let server = TestServer::start().await.unwrap();
    let (credentials, _) = register(&server).await;

    let response = server.post("/session", &credentials).await.unwrap();
    let first: SessionBody = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .post("/session/refresh", &RefreshBody::new(&first.refresh_token))
        .await
        .unwrap();
    let second: SessionBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(second.refresh_token, first.refresh_token);
    assert_eq!(second.user_id, first.user_id);

    // The rotated token is spent
    let response = server
        .post("/session/refresh", &RefreshBody::new(&first.refresh_token))
        .await
        .unwrap();
    let error = error_of(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(error.message, "refresh token revoked");

    // Its replacement still works
    let response = server
        .post("/session/refresh", &RefreshBody::new(&second.refresh_token))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_sign_in_failures() {
    let server = TestServer::start().await.unwrap();
    let (credentials, _) = register(&server).await;

    let wrong = Credentials {
        email: credentials.email.clone(),
        password: "WrongPass999".to_string(),
    };
    let response = server.post("/session", &wrong).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.post("/session", &Credentials::unique()).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_refresh_failures_are_uniform() {
    let server = TestServer::start().await.unwrap();
    let (_, session) = register(&server).await;

    let garbage = server
        .post("/session/refresh", &RefreshBody::new("not-a-token"))
        .await
        .unwrap();
    let access_as_refresh = server
        .post("/session/refresh", &RefreshBody::new(&session.access_token))
        .await
        .unwrap();

    let a = error_of(garbage, StatusCode::UNAUTHORIZED).await;
    let b = error_of(access_as_refresh, StatusCode::UNAUTHORIZED).await;
    assert_eq!(a.message, b.message);
    assert_eq!(a.code, b.code);
}

#[tokio::test]
async fn test_concurrent_refresh_has_one_winner() {
    let server = TestServer::start().await.unwrap();
    let (_, session) = register(&server).await;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let client = server.client.clone();
        let url = format!("{}/session/refresh", server.base_url());
        let body = RefreshBody::new(&session.refresh_token);
        tasks.push(tokio::spawn(async move {
            client.post(url).json(&body).send().await.unwrap().status()
        }));
    }

    let mut ok = 0;
    for task in tasks {
        match task.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::UNAUTHORIZED => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, 1);
}

#[tokio::test]
async fn test_sign_out() {
    let server = TestServer::start().await.unwrap();
    let (_, session) = register(&server).await;
    let body = RefreshBody::new(&session.refresh_token);

    let response = server.delete("/session", &body).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Idempotent
    let response = server.delete("/session", &body).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.post("/session/refresh", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_sign_out_everywhere() {
    let server = TestServer::start().await.unwrap();
    let (credentials, first) = register(&server).await;
    let response = server.post("/session", &credentials).await.unwrap();
    let second: SessionBody = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth("/users/me/sessions", &second.access_token)
        .await
        .unwrap();
    let body: RevokedBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.revoked, 2);

    for token in [&first.refresh_token, &second.refresh_token] {
        let response = server
            .post("/session/refresh", &RefreshBody::new(token))
            .await
            .unwrap();
        assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post("/session", &serde_json::json!({ "email": "a@example.com" }))
        .await
        .unwrap();
    let error = error_of(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(error.code, "INVALID_BODY");
}

// ============================================================================
// Invitations
// ============================================================================

#[tokio::test]
async fn test_invitation_flow() {
    let server = TestServer::start().await.unwrap();
    let (_, host) = register(&server).await;
    let project = seed_project(&server.store, host.user_id());
    let guest = unique_email("guest");

    let response = server
        .post_auth(
            &format!("/projects/{project}/invitations"),
            &host.access_token,
            &InviteBody::member(&guest),
        )
        .await
        .unwrap();
    let raw: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(raw.get("token").is_none());
    let invitation: InvitationBody = serde_json::from_value(raw).unwrap();
    assert_eq!(invitation.status, "pending");
    assert_eq!(invitation.guest_email, guest);
    assert_eq!(invitation.project_id, project.to_string());
    assert_eq!(invitation.invited_by, host.user_id);
    assert_eq!(invitation.role, "member");

    let token = server.last_invitation_token().expect("invitation published");
    let response = server
        .post("/invitations/confirm", &ConfirmBody::new(&token, &guest))
        .await
        .unwrap();
    let confirmation: ConfirmationBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(confirmation.status, "accepted");
    assert_eq!(confirmation.email, guest);
    assert_eq!(confirmation.project_id, project.to_string());
    assert_eq!(server.store.membership_count(project), 1);

    let response = server
        .post("/invitations/confirm", &ConfirmBody::new(&token, &guest))
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_confirm_rejects_wrong_guest_and_unknown_token() {
    let server = TestServer::start().await.unwrap();
    let (_, host) = register(&server).await;
    let project = seed_project(&server.store, host.user_id());
    let guest = unique_email("guest");

    server
        .post_auth(
            &format!("/projects/{project}/invitations"),
            &host.access_token,
            &InviteBody::member(&guest),
        )
        .await
        .unwrap();
    let token = server.last_invitation_token().unwrap();

    let response = server
        .post(
            "/invitations/confirm",
            &ConfirmBody::new(&token, &unique_email("intruder")),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .post("/invitations/confirm", &ConfirmBody::new("bogus", &guest))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_expired_invitation_is_gone() {
    let server = TestServer::start().await.unwrap();
    let (_, host) = register(&server).await;
    let project = seed_project(&server.store, host.user_id());
    let guest = unique_email("late");

    server
        .post_auth(
            &format!("/projects/{project}/invitations"),
            &host.access_token,
            &InviteBody::member(&guest),
        )
        .await
        .unwrap();
    let token = server.last_invitation_token().unwrap();
    assert!(server
        .store
        .set_invitation_expiry(&token, Utc::now() - Duration::hours(1)));

    let body = ConfirmBody::new(&token, &guest);
    let response = server.post("/invitations/confirm", &body).await.unwrap();
    assert_status(response, StatusCode::GONE).await.unwrap();

    // Now expired rather than pending
    let response = server.post("/invitations/confirm", &body).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_guest_cap_is_enforced() {
    let server = TestServer::start().await.unwrap();
    let (_, host) = register(&server).await;
    let project = seed_project(&server.store, host.user_id());
    let guest = unique_email("popular");
    let path = format!("/projects/{project}/invitations");

    for _ in 0..3 {
        let response = server
            .post_auth(&path, &host.access_token, &InviteBody::member(&guest))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server
        .post_auth(&path, &host.access_token, &InviteBody::member(&guest))
        .await
        .unwrap();
    let error = error_of(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(error.code, "GUEST_PENDING_CAP");
}

#[tokio::test]
async fn test_invite_policy_violations() {
    let server = TestServer::start().await.unwrap();
    let (host_credentials, host) = register(&server).await;
    let (_, outsider) = register(&server).await;
    let project = seed_project(&server.store, host.user_id());
    let path = format!("/projects/{project}/invitations");

    let response = server
        .post_auth(&path, &host.access_token, &InviteBody::member(&host_credentials.email))
        .await
        .unwrap();
    let error = error_of(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(error.code, "SELF_INVITE");

    let response = server
        .post_auth(
            &path,
            &outsider.access_token,
            &InviteBody::member(&unique_email("guest")),
        )
        .await
        .unwrap();
    let error = error_of(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(error.code, "HOST_NOT_MEMBER");

    let archived = Project::new("Archived", host.user_id()).with_status(ProjectStatus::Archived);
    let archived_id = archived.id;
    server.store.insert_project(archived);
    let response = server
        .post_auth(
            &format!("/projects/{archived_id}/invitations"),
            &host.access_token,
            &InviteBody::member(&unique_email("guest")),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invite_requires_authentication_and_valid_path() {
    let server = TestServer::start().await.unwrap();
    let (_, host) = register(&server).await;
    let project = seed_project(&server.store, host.user_id());
    let body = InviteBody::member(&unique_email("guest"));

    let response = server
        .post(&format!("/projects/{project}/invitations"), &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    // A refresh token is not an access token
    let response = server
        .post_auth(
            &format!("/projects/{project}/invitations"),
            &host.refresh_token,
            &body,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post_auth("/projects/not-a-uuid/invitations", &host.access_token, &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_auth(
            &format!("/projects/{}/invitations", tracker_core::ProjectId::new()),
            &host.access_token,
            &body,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_list_pending_invitations() {
    let server = TestServer::start().await.unwrap();
    let (_, host) = register(&server).await;
    let (_, member) = register(&server).await;
    let project = seed_project(&server.store, host.user_id());
    seed_member(&server.store, project, member.user_id(), ProjectRole::Member);
    let path = format!("/projects/{project}/invitations");

    for guest in [unique_email("a"), unique_email("b")] {
        server
            .post_auth(&path, &host.access_token, &InviteBody::member(&guest))
            .await
            .unwrap();
    }

    let response = server.get_auth(&path, &host.access_token).await.unwrap();
    let pending: Vec<InvitationBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|i| i.status == "pending"));

    let response = server.get_auth(&path, &member.access_token).await.unwrap();
    let error = error_of(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(error.code, "NOT_PROJECT_ADMIN");
}

#[tokio::test]
async fn test_confirmed_guest_can_not_sign_in_without_password() {
    let server = TestServer::start().await.unwrap();
    let (_, host) = register(&server).await;
    let project = seed_project(&server.store, host.user_id());
    let guest = unique_email("fresh");

    server
        .post_auth(
            &format!("/projects/{project}/invitations"),
            &host.access_token,
            &InviteBody::member(&guest),
        )
        .await
        .unwrap();
    let token = server.last_invitation_token().unwrap();
    let response = server
        .post("/invitations/confirm", &ConfirmBody::new(&token, &guest))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post(
            "/session",
            &Credentials {
                email: guest,
                password: STRONG_PASSWORD.to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_bursts() {
    let mut config = test_config();
    config.rate_limit = RateLimitConfig {
        requests_per_second: 1,
        burst: 2,
    };
    let server = TestServer::start_with_config(config).await.unwrap();

    let mut statuses = Vec::new();
    for _ in 0..5 {
        let response = server
            .post("/session/refresh", &RefreshBody::new("x"))
            .await
            .unwrap();
        statuses.push(response.status());
    }
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));

    // Health stays outside the limiter
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Postgres
// ============================================================================

#[tokio::test]
async fn test_postgres_invitation_flow() {
    let Some(database) = postgres_config() else {
        return;
    };

    let mut config = test_config();
    config.database = Some(database.clone());
    let server = ConfiguredServer::start(config).await.unwrap();
    let client = &server.client;

    let credentials = Credentials::unique();
    let response = client
        .post(server.url("/users"))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    let host: SessionBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let pool = tracker_db::create_pool(&tracker_db::DatabaseConfig::from(&database))
        .await
        .unwrap();
    let project = Project::new("Postgres project", host.user_id());
    tracker_db::PgProjectDirectory::new(pool)
        .create(&project)
        .await
        .unwrap();

    let guest = unique_email("pg-guest");
    let response = client
        .post(server.url(&format!("/projects/{}/invitations", project.id)))
        .bearer_auth(&host.access_token)
        .json(&InviteBody::member(&guest))
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = client
        .post(server.url("/session/refresh"))
        .json(&RefreshBody::new(&host.refresh_token))
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = client
        .post(server.url("/session/refresh"))
        .json(&RefreshBody::new(&host.refresh_token))
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_postgres_refresh_picks_up_current_roles() {
    let Some(database) = postgres_config() else {
        return;
    };

    let mut config = test_config();
    config.database = Some(database.clone());
    let server = ConfiguredServer::start(config).await.unwrap();
    let client = &server.client;

    let response = client
        .post(server.url("/users"))
        .json(&Credentials::unique())
        .send()
        .await
        .unwrap();
    let session: SessionBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let pool = tracker_db::create_pool(&tracker_db::DatabaseConfig::from(&database))
        .await
        .unwrap();
    tracker_db::PgUserDirectory::new(pool)
        .set_roles(session.user_id(), &["auditor".to_string()])
        .await
        .unwrap();

    let response = client
        .post(server.url("/session/refresh"))
        .json(&RefreshBody::new(&session.refresh_token))
        .send()
        .await
        .unwrap();
    let refreshed: SessionBody = assert_json(response, StatusCode::OK).await.unwrap();

    let issuer = TokenIssuer::new(&test_tokens()).unwrap();
    let before = issuer.verify_access(&session.access_token).unwrap();
    let after = issuer.verify_access(&refreshed.access_token).unwrap();
    assert!(before.roles.is_empty());
    assert_eq!(after.roles, vec!["auditor".to_string()]);
}
