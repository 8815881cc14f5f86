//! Outbound notifications emitted after state changes commit

mod notification;

pub use notification::{
    InvitationConfirmed, InvitationCreated, Notification, SessionIssued, SessionRefreshed, Topic,
};
