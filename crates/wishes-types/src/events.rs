use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Wish;

/// The realtime channel that carries newly inserted wishes.
pub const GREETINGS_CHANNEL: &str = "greetings";

/// Events sent over the WebSocket gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayEvent {
    /// Server accepted the connection
    Ready { connection_id: Uuid },

    /// A new wish was stored
    WishCreate(Wish),
}

impl GatewayEvent {
    /// Returns the channel name if this event is scoped to a channel.
    /// Events that return `None` go to the connection directly.
    pub fn channel(&self) -> Option<&'static str> {
        match self {
            Self::WishCreate(_) => Some(GREETINGS_CHANNEL),
            Self::Ready { .. } => None,
        }
    }
}

/// Commands sent FROM client TO server over WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayCommand {
    /// Start receiving events for the named channels.
    Subscribe { channels: Vec<String> },

    /// Stop receiving events for the named channels.
    Unsubscribe { channels: Vec<String> },
}
