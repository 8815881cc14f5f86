//! Token issuing and verification
//!
//! Access, refresh and invitation tokens are HS256 JWTs. Each kind has its own
//! secret and audience, so a token of one kind never verifies as another.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracker_core::{CredentialId, Email, UserId};

use crate::config::TokenConfig;
use crate::error::AppError;

/// Minimum secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Token kind, doubling as the `aud` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    Invitation,
}

impl TokenKind {
    pub fn audience(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
            Self::Invitation => "invitation",
        }
    }
}

/// Claims of a short-lived access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
}

impl AccessClaims {
    /// Get the subject as a user ID
    ///
    /// # Errors
    /// Returns an error if the subject is not a UUID
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.sub.parse().map_err(|_| AppError::InvalidToken)
    }
}

/// Claims of a refresh token; deliberately carries no roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
}

impl RefreshClaims {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.sub.parse().map_err(|_| AppError::InvalidToken)
    }

    pub fn credential_id(&self) -> Result<CredentialId, AppError> {
        self.jti.parse().map_err(|_| AppError::InvalidToken)
    }
}

/// Claims of an invitation token; `sub` is the guest's email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationClaims {
    pub sub: String,
    pub host_user_id: String,
    pub status: String,
    pub nonce: String,
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
}

/// A freshly signed token and its validity window
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl KeyPair {
    fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }
}

/// Stateless signer and verifier for every token kind
#[derive(Clone)]
pub struct TokenIssuer {
    access: KeyPair,
    refresh: KeyPair,
    invitation: KeyPair,
}

impl TokenIssuer {
    /// Build an issuer from configuration
    ///
    /// # Errors
    /// Returns `AppError::Config` if a secret is shorter than 32 bytes or two
    /// kinds share a secret
    pub fn new(config: &TokenConfig) -> Result<Self, AppError> {
        let secrets = [
            ("access", &config.access_secret),
            ("refresh", &config.refresh_secret),
            ("invitation", &config.invitation_secret),
        ];
        for (name, secret) in secrets {
            if secret.len() < MIN_SECRET_LEN {
                return Err(AppError::Config(format!(
                    "{name} token secret must be at least {MIN_SECRET_LEN} bytes"
                )));
            }
        }
        if config.access_secret == config.refresh_secret
            || config.access_secret == config.invitation_secret
            || config.refresh_secret == config.invitation_secret
        {
            return Err(AppError::Config(
                "access, refresh and invitation secrets must all differ".to_string(),
            ));
        }

        Ok(Self {
            access: KeyPair::new(&config.access_secret, config.access_token_expiry),
            refresh: KeyPair::new(&config.refresh_secret, config.refresh_token_expiry),
            invitation: KeyPair::new(&config.invitation_secret, config.invitation_token_expiry),
        })
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
            TokenKind::Invitation => &self.invitation,
        }
    }

    /// Lifetime of tokens of this kind
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        self.keys(kind).ttl
    }

    /// Issue an access token carrying the user's current roles
    pub fn issue_access(
        &self,
        user_id: UserId,
        email: &Email,
        roles: &[String],
    ) -> Result<IssuedToken, AppError> {
        let (issued_at, expires_at) = self.window(TokenKind::Access);
        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            roles: roles.to_vec(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            aud: TokenKind::Access.audience().to_string(),
        };
        self.sign(TokenKind::Access, &claims, issued_at, expires_at)
    }

    /// Issue a refresh token for credential `jti`
    pub fn issue_refresh(&self, user_id: UserId, jti: CredentialId) -> Result<IssuedToken, AppError> {
        let (issued_at, expires_at) = self.window(TokenKind::Refresh);
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: jti.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            aud: TokenKind::Refresh.audience().to_string(),
        };
        self.sign(TokenKind::Refresh, &claims, issued_at, expires_at)
    }

    /// Issue an invitation token for a guest
    ///
    /// A random nonce keeps two invitations minted in the same second distinct.
    pub fn issue_invitation(
        &self,
        guest_email: &Email,
        host_user_id: UserId,
    ) -> Result<IssuedToken, AppError> {
        let (issued_at, expires_at) = self.window(TokenKind::Invitation);
        let claims = InvitationClaims {
            sub: guest_email.to_string(),
            host_user_id: host_user_id.to_string(),
            status: "pending".to_string(),
            nonce: generate_nonce(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            aud: TokenKind::Invitation.audience().to_string(),
        };
        self.sign(TokenKind::Invitation, &claims, issued_at, expires_at)
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AppError> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AppError> {
        self.verify(token, TokenKind::Refresh)
    }

    pub fn verify_invitation(&self, token: &str) -> Result<InvitationClaims, AppError> {
        self.verify(token, TokenKind::Invitation)
    }

    /// Verify signature, algorithm, audience and expiry
    ///
    /// # Errors
    /// `AppError::TokenExpired` for a valid but expired token, `AppError::InvalidToken`
    /// for anything else
    pub fn verify<C: DeserializeOwned>(&self, token: &str, kind: TokenKind) -> Result<C, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(&[kind.audience()]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);

        decode::<C>(token, &self.keys(kind).decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    fn window(&self, kind: TokenKind) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now, now + self.keys(kind).ttl)
    }

    fn sign<C: Serialize>(
        &self,
        kind: TokenKind,
        claims: &C,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.keys(kind).encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode {kind:?} token: {e}")))?;
        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .field("invitation_ttl", &self.invitation.ttl)
            .finish_non_exhaustive()
    }
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
