use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use wishes_db::Database;
use wishes_db::models::WishRow;
use wishes_types::models::{NewWish, Wish};

/// Persistence seam for the guestbook. Calls are blocking; the service runs
/// them off the async runtime.
pub trait WishStore: Send + Sync + 'static {
    /// Insert one wish and return it with its store-assigned id and timestamp.
    fn insert_wish(&self, wish: &NewWish) -> Result<Wish>;

    /// Up to `limit` wishes, newest first.
    fn recent_wishes(&self, limit: u32) -> Result<Vec<Wish>>;
}

impl WishStore for Database {
    fn insert_wish(&self, wish: &NewWish) -> Result<Wish> {
        let row = Database::insert_wish(self, &wish.name, &wish.message, wish.emoji.as_deref())?;
        row_to_wish(row)
    }

    fn recent_wishes(&self, limit: u32) -> Result<Vec<Wish>> {
        Database::recent_wishes(self, limit)?
            .into_iter()
            .map(row_to_wish)
            .collect()
    }
}

fn row_to_wish(row: WishRow) -> Result<Wish> {
    let id: Uuid = row
        .id
        .parse()
        .with_context(|| format!("corrupt wish id '{}'", row.id))?;
    let created_at = parse_timestamp(&row.created_at)
        .with_context(|| format!("corrupt created_at '{}' on wish '{}'", row.created_at, row.id))?;

    Ok(Wish {
        id,
        name: row.name,
        message: row.message,
        emoji: row.emoji,
        created_at,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by plain datetime('now') have no zone or fraction
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(Into::into)
}
