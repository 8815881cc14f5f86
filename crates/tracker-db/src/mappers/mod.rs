//! Entity <-> model mappers
//!
//! Rows hold enums and emails as text, so model-to-entity conversion is
//! fallible: a value the domain cannot parse surfaces as a database error.

mod credential;
mod invitation;
mod membership;
mod project;
mod user;

use tracker_core::DomainError;

pub(crate) fn corrupt_row(table: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::DatabaseError(format!("corrupt {table} row: {detail}"))
}
