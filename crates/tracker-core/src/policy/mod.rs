//! Membership policy - pure decision functions over already-loaded state

mod membership;

pub use membership::{InvitationCaps, InviteCheck, MembershipPolicy, PolicyViolation};
