//! Database row types. These map directly to SQLite rows.
//! Distinct from wishes-types API models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct WishRow {
    pub id: String,
    pub name: String,
    pub message: String,
    pub emoji: Option<String>,
    pub created_at: String,
}
