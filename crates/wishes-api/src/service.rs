use std::sync::Arc;

use tracing::{error, info};

use wishes_gateway::dispatcher::Dispatcher;
use wishes_types::events::GatewayEvent;
use wishes_types::models::{NewWish, RECENT_WISHES_LIMIT, Wish};

use crate::error::ApiError;
use crate::store::WishStore;

/// Write and read paths of the guestbook. A successful write is published
/// to gateway subscribers without waiting on delivery.
#[derive(Clone)]
pub struct GuestbookService {
    store: Arc<dyn WishStore>,
    dispatcher: Dispatcher,
}

impl GuestbookService {
    pub fn new(store: Arc<dyn WishStore>, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn create(&self, wish: NewWish) -> Result<Wish, ApiError> {
        // Blank emoji is stored as no emoji
        let wish = NewWish {
            emoji: wish.emoji.filter(|e| !e.is_empty()),
            ..wish
        };

        // Run blocking DB insert off the async runtime
        let store = self.store.clone();
        let stored = tokio::task::spawn_blocking(move || store.insert_wish(&wish))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal(e.to_string())
            })?
            .map_err(ApiError::WriteFailed)?;

        info!(id = %stored.id, "wish stored");

        self.dispatcher.broadcast(GatewayEvent::WishCreate(stored.clone()));

        Ok(stored)
    }

    pub async fn recent(&self) -> Result<Vec<Wish>, ApiError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.recent_wishes(RECENT_WISHES_LIMIT))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal(e.to_string())
            })?
            .map_err(ApiError::ReadFailed)
    }
}
