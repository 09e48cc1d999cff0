use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted name length, in UTF-16 code units, after trimming.
pub const NAME_MAX_LEN: usize = 50;

/// Maximum accepted message length, in UTF-16 code units, after trimming.
pub const MESSAGE_MAX_LEN: usize = 500;

/// How many wishes the read path returns.
pub const RECENT_WISHES_LIMIT: u32 = 50;

/// One guestbook entry. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wish {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub emoji: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A submission that passed validation: name and message are trimmed and
/// within bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWish {
    pub name: String,
    pub message: String,
    pub emoji: Option<String>,
}
