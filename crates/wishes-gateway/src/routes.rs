use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use tokio_util::sync::CancellationToken;

use crate::connection;
use crate::dispatcher::Dispatcher;

#[derive(Clone)]
struct GatewayState {
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
}

/// `/gateway` WebSocket route. Open connections close when `shutdown` fires.
pub fn router(dispatcher: Dispatcher, shutdown: CancellationToken) -> Router {
    Router::new()
        .route("/gateway", get(ws_upgrade))
        .with_state(GatewayState { dispatcher, shutdown })
}

async fn ws_upgrade(State(state): State<GatewayState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| connection::handle_connection(socket, state.dispatcher, state.shutdown))
}
