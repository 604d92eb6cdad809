use std::path::PathBuf;
use thiserror::Error;

/// Failures of the map job store.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Map store query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot create map store directory '{path}': {source}")]
    StoreDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A schema migration for the `maps` table could not be applied.
    #[error("Map store migration v{version} ({description}) failed: {reason}")]
    Migration {
        version: u32,
        description: &'static str,
        reason: String,
    },

    /// A job task panicked while holding the connection.
    #[error("Map store connection poisoned by a panicked job")]
    ConnectionPoisoned,
}
