use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::{debug, warn};

use wishes_types::api::{CreateWishRequest, CreateWishResponse, ListWishesResponse};

use crate::error::ApiError;
use crate::source::source_id;
use crate::state::AppState;
use crate::validation::validate;

pub async fn list_greetings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let greetings = state.guestbook.recent().await?;
    Ok(Json(ListWishesResponse { greetings }))
}

/// Throttle, then parse, then validate, then store. A throttled request is
/// rejected before its body is looked at.
pub async fn create_greeting(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let source = source_id(&headers);
    if !state.limiter.check(&source) {
        warn!(%source, "submission throttled");
        return Err(ApiError::RateLimited);
    }

    let req: CreateWishRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedRequest(e.to_string()))?;

    let wish = validate(req).map_err(|rule| {
        debug!(%source, "submission rejected: {}", rule);
        rule
    })?;

    let greeting = state.guestbook.create(wish).await?;

    Ok((StatusCode::CREATED, Json(CreateWishResponse { greeting })))
}
