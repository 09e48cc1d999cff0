pub mod error;
pub mod greetings;
pub mod rate_limit;
pub mod service;
pub mod source;
pub mod state;
pub mod store;
pub mod validation;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Routes for the guestbook HTTP API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/greetings",
            get(greetings::list_greetings).post(greetings::create_greeting),
        )
        .with_state(state)
}
