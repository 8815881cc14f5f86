//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    InvitationConfig, RateLimitConfig, RedisConfig, ServerConfig, SessionSettings, TokenConfig,
};
