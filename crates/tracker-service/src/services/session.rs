//! Session service
//!
//! Sign-in, registration, refresh rotation and sign-out. A refresh token is
//! single-use: rotation revokes the presented credential and persists its
//! successor in one atomic store operation.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use tracker_common::{fingerprint, fingerprints_match, validate_password_strength, AccessClaims};
use tracker_core::{
    CredentialId, DomainError, Email, Notification, RefreshCredential, RotationOutcome, User, UserId,
};

use crate::dto::{RefreshTokenRequest, RegisterRequest, SessionResponse, SignInRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Sign in with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_in(&self, request: SignInRequest) -> ServiceResult<SessionResponse> {
        let email = parse_email(&request.email)?;

        let user = self
            .ctx
            .users()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Sign-in failed: user not found");
                ServiceError::not_found("User", &email)
            })?;

        let Some(password_hash) = user.password_hash.clone() else {
            warn!(user_id = %user.id, "Sign-in failed: account has no password");
            return Err(DomainError::InvalidCredentials.into());
        };

        let is_valid = self
            .ctx
            .passwords()
            .verify(request.password, password_hash)
            .await?;
        if !is_valid {
            warn!(user_id = %user.id, "Sign-in failed: invalid password");
            return Err(DomainError::InvalidCredentials.into());
        }

        let session = self.open_session(&user).await?;
        self.ctx
            .publish(Notification::user_signed(user.id, user.email.clone()))
            .await;

        info!(user_id = %user.id, "User signed in");
        Ok(session)
    }

    /// Register a password account and open its first session
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<SessionResponse> {
        validate_password_strength(&request.password)?;
        let email = parse_email(&request.email)?;

        if self.ctx.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = self.ctx.passwords().hash(request.password).await?;
        let user = User::new(email, password_hash);
        self.ctx.users().create(&user).await?;

        info!(user_id = %user.id, "User registered");

        let session = self.open_session(&user).await?;
        self.ctx
            .publish(Notification::user_signed(user.id, user.email.clone()))
            .await;
        Ok(session)
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// Every rejection carries the same message so callers cannot tell an
    /// unknown token from a revoked, expired or replayed one.
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<SessionResponse> {
        let claims = self
            .ctx
            .tokens()
            .verify_refresh(&request.refresh_token)
            .map_err(|e| {
                debug!(error = %e, "Refresh token failed verification");
                ServiceError::refresh_revoked()
            })?;
        let subject = claims.user_id().map_err(|_| ServiceError::refresh_revoked())?;
        let jti = claims
            .credential_id()
            .map_err(|_| ServiceError::refresh_revoked())?;

        let now = Utc::now();
        let current = self
            .ctx
            .credentials()
            .find(jti)
            .await?
            .ok_or(DomainError::CredentialNotFound)?;

        let presented = fingerprint(&request.refresh_token);
        if current.subject_id != subject || !fingerprints_match(&current.token_hash, &presented) {
            warn!(credential_id = %jti, "Refresh token does not match its credential");
            return Err(ServiceError::refresh_revoked());
        }

        if current.was_rotated() {
            self.on_reuse(&current, now).await?;
            return Err(ServiceError::refresh_revoked());
        }
        if !current.is_usable(now) {
            debug!(credential_id = %jti, "Refresh credential revoked or expired");
            return Err(ServiceError::refresh_revoked());
        }

        let user = self
            .ctx
            .users()
            .find_by_id(subject)
            .await?
            .ok_or_else(ServiceError::refresh_revoked)?;

        // Roles come from the current user row, not from the old token
        let access = self
            .ctx
            .tokens()
            .issue_access(user.id, &user.email, &user.roles)?;
        let (refresh_token, successor) = self.mint_refresh(user.id)?;

        let outcome = self
            .ctx
            .credentials()
            .rotate(jti, &current.token_hash, &successor, now)
            .await?;
        if outcome == RotationOutcome::Stale {
            warn!(user_id = %user.id, credential_id = %jti, "Refresh rotation lost a race");
            return Err(ServiceError::refresh_revoked());
        }

        self.ctx.publish(Notification::user_refreshed(user.id)).await;

        info!(user_id = %user.id, "Session refreshed");
        Ok(SessionResponse::new(access.token, refresh_token, user.id))
    }

    /// Revoke the credential behind one refresh token
    ///
    /// Signing out an already revoked session succeeds.
    #[instrument(skip(self, request))]
    pub async fn sign_out(&self, request: RefreshTokenRequest) -> ServiceResult<()> {
        let claims = self
            .ctx
            .tokens()
            .verify_refresh(&request.refresh_token)
            .map_err(|_| ServiceError::refresh_revoked())?;
        let jti = claims
            .credential_id()
            .map_err(|_| ServiceError::refresh_revoked())?;

        let credential = self
            .ctx
            .credentials()
            .find(jti)
            .await?
            .ok_or(DomainError::CredentialNotFound)?;
        if !fingerprints_match(&credential.token_hash, &fingerprint(&request.refresh_token)) {
            return Err(ServiceError::refresh_revoked());
        }

        let revoked = self.ctx.credentials().revoke(jti, Utc::now()).await?;
        info!(
            user_id = %credential.subject_id,
            already_revoked = !revoked,
            "User signed out"
        );
        Ok(())
    }

    /// Revoke every outstanding credential of a user
    #[instrument(skip(self))]
    pub async fn sign_out_everywhere(&self, user_id: UserId) -> ServiceResult<u64> {
        let revoked = self
            .ctx
            .credentials()
            .revoke_all_for_subject(user_id, Utc::now())
            .await?;
        info!(user_id = %user_id, revoked, "User signed out everywhere");
        Ok(revoked)
    }

    /// Validate an access token
    #[instrument(skip(self, token))]
    pub fn authenticate(&self, token: &str) -> ServiceResult<AccessClaims> {
        Ok(self.ctx.tokens().verify_access(token)?)
    }

    async fn open_session(&self, user: &User) -> ServiceResult<SessionResponse> {
        let access = self
            .ctx
            .tokens()
            .issue_access(user.id, &user.email, &user.roles)?;
        let (refresh_token, credential) = self.mint_refresh(user.id)?;
        self.ctx.credentials().insert(&credential).await?;
        Ok(SessionResponse::new(access.token, refresh_token, user.id))
    }

    fn mint_refresh(&self, user_id: UserId) -> ServiceResult<(String, RefreshCredential)> {
        let jti = CredentialId::new();
        let issued = self.ctx.tokens().issue_refresh(user_id, jti)?;
        let credential = RefreshCredential::new(
            jti,
            user_id,
            fingerprint(&issued.token),
            issued.issued_at,
            issued.expires_at - issued.issued_at,
        );
        Ok((issued.token, credential))
    }

    // A rotated credential was presented again: either the client retried or
    // the token leaked.
    async fn on_reuse(&self, credential: &RefreshCredential, now: DateTime<Utc>) -> ServiceResult<()> {
        warn!(
            user_id = %credential.subject_id,
            credential_id = %credential.id,
            "refresh token reuse detected"
        );
        if self.ctx.session_settings().revoke_all_on_reuse {
            let revoked = self
                .ctx
                .credentials()
                .revoke_all_for_subject(credential.subject_id, now)
                .await?;
            warn!(
                user_id = %credential.subject_id,
                revoked,
                "Revoked all sessions after refresh token reuse"
            );
        }
        Ok(())
    }
}

pub(crate) fn parse_email(raw: &str) -> ServiceResult<Email> {
    Ok(Email::parse(raw).map_err(DomainError::from)?)
}
