//! Authentication utilities

mod fingerprint;
mod password;
mod token;

pub use fingerprint::{fingerprint, fingerprints_match};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordService};
pub use token::{
    AccessClaims, InvitationClaims, IssuedToken, RefreshClaims, TokenIssuer, TokenKind,
    MIN_SECRET_LEN,
};
