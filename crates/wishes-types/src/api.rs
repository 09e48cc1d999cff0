use serde::{Deserialize, Serialize};

use crate::models::Wish;

// -- Greetings --

/// Body of `POST /api/greetings`.
///
/// `name` and `message` are optional at the wire level so that a missing
/// field reports the same rule as an empty one.
#[derive(Debug, Deserialize)]
pub struct CreateWishRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWishResponse {
    pub greeting: Wish,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListWishesResponse {
    pub greetings: Vec<Wish>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
