use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

mod map;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create_map", post(map::create_map))
        .route("/check_status/{id}", get(map::check_status))
}
