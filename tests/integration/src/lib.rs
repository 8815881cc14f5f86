//! Integration test utilities for the tracker API
//!
//! Boots the full axum application on an ephemeral port and drives it over
//! HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
