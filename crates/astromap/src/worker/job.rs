use std::fmt;
use std::path::PathBuf;

use tokio::task::JoinHandle;

use crate::db::map_repo::MapRow;

/// Lifecycle of a map record. `InProgress` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStatus {
    InProgress,
    Created,
    Failed,
}

impl MapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapStatus::InProgress => "in_progress",
            MapStatus::Created => "created",
            MapStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(MapStatus::InProgress),
            "created" => Some(MapStatus::Created),
            "failed" => Some(MapStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, MapStatus::InProgress)
    }
}

impl fmt::Display for MapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted map record as seen by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct MapJob {
    pub id: i64,
    pub user_id: String,
    pub map_id: String,
    /// Raw status string from the store.
    pub status: String,
    /// Artifact location; only meaningful once `status` is `created`.
    pub url: Option<PathBuf>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl MapJob {
    /// Parsed status, `None` for values this version does not write.
    pub fn state(&self) -> Option<MapStatus> {
        MapStatus::parse(&self.status)
    }
}

impl From<MapRow> for MapJob {
    fn from(row: MapRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_uuid,
            map_id: row.map_uuid,
            status: row.status,
            url: (!row.url.is_empty()).then(|| PathBuf::from(row.url)),
            error: row.error,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Returned by a submission. Dropping it leaves the background work running.
#[derive(Debug)]
pub struct JobHandle {
    pub id: i64,
    pub map_id: String,
    task: JoinHandle<MapStatus>,
}

impl JobHandle {
    pub(crate) fn new(id: i64, map_id: String, task: JoinHandle<MapStatus>) -> Self {
        Self { id, map_id, task }
    }

    /// Waits for the background work and returns the terminal status it
    /// wrote. A panicked or cancelled task counts as `Failed`.
    pub async fn wait(self) -> MapStatus {
        self.task.await.unwrap_or(MapStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(url: &str, status: &str) -> MapRow {
        MapRow {
            id: 7,
            user_uuid: "user".to_string(),
            map_uuid: "map".to_string(),
            url: url.to_string(),
            status: status.to_string(),
            error: None,
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [MapStatus::InProgress, MapStatus::Created, MapStatus::Failed] {
            assert_eq!(MapStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MapStatus::parse("done"), None);
    }

    #[test]
    fn test_only_in_progress_is_pending() {
        assert!(!MapStatus::InProgress.is_terminal());
        assert!(MapStatus::Created.is_terminal());
        assert!(MapStatus::Failed.is_terminal());
    }

    #[test]
    fn test_empty_url_reads_as_none() {
        let job = MapJob::from(row("", "in_progress"));
        assert_eq!(job.url, None);
        assert_eq!(job.state(), Some(MapStatus::InProgress));
    }

    #[test]
    fn test_row_conversion() {
        let job = MapJob::from(row("/media/sky_map_abcdefghij.png", "created"));
        assert_eq!(job.id, 7);
        assert_eq!(job.map_id, "map");
        assert_eq!(job.url, Some(PathBuf::from("/media/sky_map_abcdefghij.png")));
        assert_eq!(job.state(), Some(MapStatus::Created));
    }

    #[tokio::test]
    async fn test_wait_on_panicked_task_is_failed() {
        fn explode() -> MapStatus {
            panic!("boom")
        }
        let task = tokio::spawn(async { explode() });
        let handle = JobHandle::new(1, "map".to_string(), task);
        assert_eq!(handle.wait().await, MapStatus::Failed);
    }
}
