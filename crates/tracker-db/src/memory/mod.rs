//! In-memory store
//!
//! Implements every store trait over one set of tables guarded by a single
//! mutex. Each trait method runs inside one critical section and never awaits
//! while holding the lock, which gives the same all-or-nothing guarantees as
//! the PostgreSQL transactions. Used by tests and by the server when no
//! `DATABASE_URL` is configured.

mod store;

pub use store::MemoryStore;
