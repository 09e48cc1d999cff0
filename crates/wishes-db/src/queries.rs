use crate::Database;
use crate::models::WishRow;
use anyhow::Result;
use rusqlite::{Connection, Row};
use uuid::Uuid;

impl Database {
    // -- Wishes --

    /// Insert one wish and return the stored row, including the
    /// store-assigned `id` and `created_at`.
    pub fn insert_wish(&self, name: &str, message: &str, emoji: Option<&str>) -> Result<WishRow> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO wishes (id, name, message, emoji) VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, name, message, emoji, created_at",
                rusqlite::params![id, name, message, emoji],
                map_wish_row,
            )?;
            Ok(row)
        })
    }

    /// Most recent wishes, newest first.
    pub fn recent_wishes(&self, limit: u32) -> Result<Vec<WishRow>> {
        self.with_conn(|conn| query_recent_wishes(conn, limit))
    }
}

fn query_recent_wishes(conn: &Connection, limit: u32) -> Result<Vec<WishRow>> {
    // rowid breaks ties between rows stored in the same millisecond
    let mut stmt = conn.prepare(
        "SELECT id, name, message, emoji, created_at
         FROM wishes
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([limit], map_wish_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_wish_row(row: &Row<'_>) -> rusqlite::Result<WishRow> {
    Ok(WishRow {
        id: row.get(0)?,
        name: row.get(1)?,
        message: row.get(2)?,
        emoji: row.get(3)?,
        created_at: row.get(4)?,
    })
}
