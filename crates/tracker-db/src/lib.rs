//! # tracker-db
//!
//! Storage adapters for the tracker-core store traits.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx, with the atomic rotation and
//!   acceptance operations each running in one transaction
//! - Database models with SQLx `FromRow` derives and fallible mappers
//! - Connection pool, runtime-loaded migrations, and a readiness probe
//! - `MemoryStore`, an in-process implementation of every trait
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tracker_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use tracker_db::PgCredentialStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::new("postgres://localhost/tracker")).await?;
//!     run_migrations(&pool).await?;
//!     let credentials = PgCredentialStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgHealthProbe, PgPool};
pub use repositories::{
    PgCredentialStore, PgInvitationStore, PgMembershipRepository, PgProjectDirectory,
    PgUserDirectory,
};
