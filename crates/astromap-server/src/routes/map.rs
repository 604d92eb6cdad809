use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, info};

use astromap::error::JobError;
use astromap::worker::MapStatus;

use crate::schemas::{CreateMapRequest, CreateMapResponse, ErrorResponse, PendingResponse};
use crate::state::AppState;

const NOT_FOUND: &str = "not_found";
const STORE_UNAVAILABLE: &str = "store_unavailable";
const ARTIFACT_MISSING: &str = "artifact_missing";

/// Records the request and schedules generation; never waits for the map.
pub async fn create_map(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateMapRequest>,
) -> Response {
    match state.orchestrator.submit(body.into()) {
        Ok(handle) => {
            info!("Accepted map {} (record {})", handle.map_id, handle.id);
            Json(CreateMapResponse::accepted()).into_response()
        }
        Err(e) => {
            error!("Failed to schedule map: {}", e);
            Json(CreateMapResponse::rejected()).into_response()
        }
    }
}

/// Serves the PNG once created, otherwise reports the job state.
pub async fn check_status(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let job = match state.orchestrator.status(&id) {
        Ok(job) => job,
        Err(JobError::NotFound(_)) => {
            return (StatusCode::NOT_FOUND, Json(ErrorResponse::new(NOT_FOUND))).into_response();
        }
        Err(e) => {
            error!("Status lookup for map {} failed: {}", id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(STORE_UNAVAILABLE)),
            )
                .into_response();
        }
    };

    match job.state() {
        Some(MapStatus::Created) => {
            let Some(url) = job.url else {
                error!("Map {} is created but has no artifact path", id);
                return Json(ErrorResponse::new(ARTIFACT_MISSING)).into_response();
            };
            match tokio::fs::read(&url).await {
                Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
                Err(e) => {
                    error!("Failed to read map {} from {}: {}", id, url.display(), e);
                    Json(ErrorResponse::new(ARTIFACT_MISSING)).into_response()
                }
            }
        }
        Some(MapStatus::InProgress) => Json(PendingResponse::new()).into_response(),
        _ => Json(ErrorResponse::new(job.status)).into_response(),
    }
}
