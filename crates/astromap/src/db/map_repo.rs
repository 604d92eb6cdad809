//! Map repository: CRUD operations for the `maps` table.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DatabaseError};

/// A raw map row from the database.
#[derive(Debug, Clone)]
pub struct MapRow {
    pub id: i64,
    pub user_uuid: String,
    pub map_uuid: String,
    pub url: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl MapRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_uuid: row.get("user_uuid")?,
            map_uuid: row.get("map_uuid")?,
            url: row.get("url")?,
            status: row.get("status")?,
            error: row.get("error")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Inserts a new `in_progress` row and returns its surrogate id.
///
/// `map_uuid` is not checked for uniqueness; every call creates a new row.
pub fn insert(db: &Database, user_uuid: &str, map_uuid: &str) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        let ts = now();
        conn.execute(
            "INSERT INTO maps (user_uuid, map_uuid, status, created_at, updated_at)
             VALUES (?1, ?2, 'in_progress', ?3, ?3)",
            params![user_uuid, map_uuid, ts],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

#[cfg(test)]
fn find_by_id(db: &Database, id: i64) -> Result<Option<MapRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM maps WHERE id = ?1",
                params![id],
                MapRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Finds the most recently created row for a public map id.
pub fn find_latest_by_map_uuid(
    db: &Database,
    map_uuid: &str,
) -> Result<Option<MapRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM maps WHERE map_uuid = ?1 ORDER BY id DESC LIMIT 1",
                params![map_uuid],
                MapRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Lists every row for a public map id, oldest first.
pub fn list_by_map_uuid(db: &Database, map_uuid: &str) -> Result<Vec<MapRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM maps WHERE map_uuid = ?1 ORDER BY id ASC")?;
        let rows = stmt
            .query_map(params![map_uuid], MapRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Terminal success write. Returns `false` if the row was not `in_progress`.
pub fn mark_created(db: &Database, id: i64, url: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE maps SET status = 'created', url = ?2, updated_at = ?3
             WHERE id = ?1 AND status = 'in_progress'",
            params![id, url, now()],
        )?;
        Ok(changed == 1)
    })
}

/// Terminal failure write. Returns `false` if the row was not `in_progress`.
pub fn mark_failed(db: &Database, id: i64, error: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE maps SET status = 'failed', error = ?2, updated_at = ?3
             WHERE id = ?1 AND status = 'in_progress'",
            params![id, error, now()],
        )?;
        Ok(changed == 1)
    })
}
