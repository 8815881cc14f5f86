//! # tracker-common
//!
//! Shared utilities: configuration, error handling, token signing, password
//! hashing, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    fingerprint, fingerprints_match, hash_password, validate_password_strength, verify_password,
    AccessClaims, InvitationClaims, IssuedToken, PasswordService, RefreshClaims, TokenIssuer,
    TokenKind,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    InvitationConfig, RateLimitConfig, RedisConfig, ServerConfig, SessionSettings, TokenConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
