use std::collections::HashSet;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use futures_util::stream::SplitSink;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use wishes_types::events::{GatewayCommand, GatewayEvent};

use crate::dispatcher::Dispatcher;

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);
const MAX_MISSED_HEARTBEATS: u8 = 2;

/// Channels this connection asked to hear about.
#[derive(Debug, Default)]
pub struct Subscriptions {
    channels: HashSet<String>,
}

impl Subscriptions {
    pub fn apply(&mut self, cmd: GatewayCommand) {
        match cmd {
            GatewayCommand::Subscribe { channels } => self.channels.extend(channels),
            GatewayCommand::Unsubscribe { channels } => {
                for channel in &channels {
                    self.channels.remove(channel);
                }
            }
        }
    }

    /// Channel-scoped events pass only when subscribed; unscoped events
    /// always pass.
    pub fn wants(&self, event: &GatewayEvent) -> bool {
        match event.channel() {
            Some(channel) => self.channels.contains(channel),
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Drive one viewer's WebSocket until the client leaves, the heartbeat
/// times out, or `shutdown` fires.
pub async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher, shutdown: CancellationToken) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before Ready so nothing published after Ready is missed
    let mut broadcast_rx = dispatcher.subscribe();

    if !send_event(&mut sender, &GatewayEvent::Ready { connection_id }).await {
        return;
    }

    info!(%connection_id, "viewer connected to gateway");

    let mut subscriptions = Subscriptions::default();
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await;
    let mut pong_received = true;
    let mut missed_heartbeats: u8 = 0;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
            result = broadcast_rx.recv() => {
                let event = match result {
                    Ok(event) => event,
                    Err(RecvError::Lagged(n)) => {
                        warn!(%connection_id, "Broadcast receiver lagged by {} messages", n);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                if !subscriptions.wants(&event) {
                    continue;
                }

                if !send_event(&mut sender, &event).await {
                    break;
                }
            }
            incoming = receiver.next() => {
                let msg = match incoming {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        debug!(%connection_id, "websocket read error: {}", e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => match serde_json::from_str::<GatewayCommand>(&text) {
                        Ok(cmd) => {
                            trace!(%connection_id, ?cmd, "gateway command");
                            subscriptions.apply(cmd);
                        }
                        Err(e) => {
                            warn!(
                                %connection_id,
                                "bad command: {} -- raw: {}",
                                e,
                                truncate(&text, 200)
                            );
                        }
                    },
                    Message::Pong(_) => pong_received = true,
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            _ = heartbeat.tick() => {
                if std::mem::replace(&mut pong_received, false) {
                    missed_heartbeats = 0;
                } else {
                    missed_heartbeats += 1;
                    if missed_heartbeats >= MAX_MISSED_HEARTBEATS {
                        warn!(%connection_id, "Heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                        break;
                    }
                }
                if sender.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(%connection_id, "viewer disconnected from gateway");
}

async fn send_event(sender: &mut SplitSink<WebSocket, Message>, event: &GatewayEvent) -> bool {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!("failed to encode gateway event: {}", e);
            // Skip this event, keep the connection
            return true;
        }
    };
    sender.send(Message::Text(text.into())).await.is_ok()
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wishes_types::events::GREETINGS_CHANNEL;
    use wishes_types::models::Wish;

    fn wish_event() -> GatewayEvent {
        GatewayEvent::WishCreate(Wish {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            message: "hi".into(),
            emoji: None,
            created_at: Utc::now(),
        })
    }

    #[test]
    fn wish_events_need_a_subscription() {
        let mut subs = Subscriptions::default();
        assert!(!subs.wants(&wish_event()));

        subs.apply(GatewayCommand::Subscribe {
            channels: vec![GREETINGS_CHANNEL.to_string()],
        });
        assert!(subs.wants(&wish_event()));

        subs.apply(GatewayCommand::Unsubscribe {
            channels: vec![GREETINGS_CHANNEL.to_string()],
        });
        assert!(!subs.wants(&wish_event()));
        assert!(subs.is_empty());
    }

    #[test]
    fn unknown_channels_do_not_match_wishes() {
        let mut subs = Subscriptions::default();
        subs.apply(GatewayCommand::Subscribe {
            channels: vec!["photos".to_string()],
        });
        assert_eq!(subs.len(), 1);
        assert!(!subs.wants(&wish_event()));
    }

    #[test]
    fn ready_is_always_delivered() {
        let subs = Subscriptions::default();
        assert!(subs.wants(&GatewayEvent::Ready { connection_id: Uuid::new_v4() }));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("🎉🎉🎉", 2), "🎉🎉");
        assert_eq!(truncate("hi", 200), "hi");
    }
}
