use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info, warn};
use rand::Rng;

use crate::db::{map_repo, Database};
use crate::error::JobError;
use crate::pipeline::{MapGenerator, MapRequest};

use super::job::{JobHandle, MapJob, MapStatus};

const ARTIFACT_PREFIX: &str = "sky_map_";
const ARTIFACT_SUFFIX_LEN: usize = 10;

/// Tracks map requests from submission to a terminal status.
///
/// Submission writes an `in_progress` record synchronously and starts the
/// generation in the background. Each background run performs exactly one
/// terminal write: `created` with the artifact path, or `failed`.
#[derive(Clone)]
pub struct JobOrchestrator {
    db: Database,
    generator: Arc<dyn MapGenerator>,
    media_dir: PathBuf,
}

impl JobOrchestrator {
    pub fn new(db: Database, generator: Arc<dyn MapGenerator>, media_dir: PathBuf) -> Self {
        Self {
            db,
            generator,
            media_dir,
        }
    }

    /// Records the request and schedules generation. Must be called from
    /// within a Tokio runtime.
    pub fn submit(&self, request: MapRequest) -> Result<JobHandle, JobError> {
        let id = map_repo::insert(&self.db, &request.user_id, &request.map_id)?;
        let destination = self.media_dir.join(artifact_name());

        info!(
            "Scheduled map {} (record {}) -> {}",
            request.map_id,
            id,
            destination.display()
        );

        let map_id = request.map_id.clone();
        let task = tokio::spawn(run_job(
            self.db.clone(),
            Arc::clone(&self.generator),
            id,
            request,
            destination,
        ));

        Ok(JobHandle::new(id, map_id, task))
    }

    /// Latest record for `map_id`.
    pub fn status(&self, map_id: &str) -> Result<MapJob, JobError> {
        map_repo::find_latest_by_map_uuid(&self.db, map_id)?
            .map(MapJob::from)
            .ok_or_else(|| JobError::NotFound(map_id.to_string()))
    }

    /// Every record ever submitted under `map_id`, oldest first.
    pub fn history(&self, map_id: &str) -> Result<Vec<MapJob>, JobError> {
        Ok(map_repo::list_by_map_uuid(&self.db, map_id)?
            .into_iter()
            .map(MapJob::from)
            .collect())
    }
}

async fn run_job(
    db: Database,
    generator: Arc<dyn MapGenerator>,
    id: i64,
    request: MapRequest,
    destination: PathBuf,
) -> MapStatus {
    match generator.generate(&request, &destination).await {
        Ok(()) => {
            let url = destination.to_string_lossy();
            match map_repo::mark_created(&db, id, &url) {
                Ok(true) => {
                    info!("Map {} created at {}", request.map_id, url);
                    MapStatus::Created
                }
                Ok(false) => {
                    warn!("Map record {} was already terminal; result not recorded", id);
                    MapStatus::Created
                }
                Err(e) => {
                    error!("Failed to record completion of map {}: {}", request.map_id, e);
                    discard_artifact(&destination).await;
                    record_failure(&db, id, &request.map_id, &e.to_string());
                    MapStatus::Failed
                }
            }
        }
        Err(e) => {
            error!("Map {} failed: {}", request.map_id, e);
            record_failure(&db, id, &request.map_id, &e.to_string());
            MapStatus::Failed
        }
    }
}

fn record_failure(db: &Database, id: i64, map_id: &str, reason: &str) {
    if let Err(store_err) = map_repo::mark_failed(db, id, reason) {
        error!("Failed to record failure of map {}: {}", map_id, store_err);
    }
}

async fn discard_artifact(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!("Removed unrecorded artifact {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove {}: {}", path.display(), e),
    }
}

/// `sky_map_` followed by ten random lowercase letters, `.png`.
pub fn artifact_name() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ARTIFACT_SUFFIX_LEN)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect();
    format!("{}{}.png", ARTIFACT_PREFIX, suffix)
}
