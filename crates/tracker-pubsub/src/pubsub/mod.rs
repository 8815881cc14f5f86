//! Redis Pub/Sub module.

mod channels;
mod publisher;

pub use channels::{EventChannel, CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
