//! Email address value object

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

/// Error when an email address is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid email address: {0}")]
pub struct EmailParseError(pub String);

/// Normalised email address
///
/// Stored trimmed and lowercased so that lookups, uniqueness checks and
/// invitation matching never disagree on case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse and normalise an address
    pub fn parse(raw: &str) -> Result<Self, EmailParseError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.validate_email() {
            Ok(Self(normalised))
        } else {
            Err(EmailParseError(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
