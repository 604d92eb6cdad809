mod routes;
mod schemas;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::net::TcpListener;

use astromap::config::{load_config, Config};
use astromap::db::Database;
use astromap::error::{AstroMapError, JobError, PipelineError};
use astromap::pipeline::MapPipeline;
use astromap::resolver::{NominatimGeocoder, TzfTimezoneLookup};
use astromap::sky::AnalyticEphemeris;
use astromap::worker::JobOrchestrator;

use crate::routes::api_routes;
use crate::state::AppState;

const CONFIG_ENV: &str = "ASTROMAP_CONFIG";
const PORT_ENV: &str = "ASTROMAP_PORT";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("astromap-server stopped: {}", e);
            eprintln!("astromap-server: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AstroMapError> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let mut config = match std::env::var(CONFIG_ENV) {
        Ok(path) => load_config(path)?,
        Err(_) => Config::default(),
    };

    astromap::init_logging(&config.logs_dir())?;
    info!("Starting astromap-server v{}", env!("CARGO_PKG_VERSION"));

    if let Ok(port) = std::env::var(PORT_ENV) {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!("Ignoring invalid {}={}", PORT_ENV, port),
        }
    }

    let db = Database::open(&config.database_path()).map_err(JobError::from)?;
    let geocoder = NominatimGeocoder::new(&config.geocoder).map_err(PipelineError::from)?;
    let pipeline = MapPipeline::from_config(
        &config,
        Arc::new(geocoder),
        Arc::new(TzfTimezoneLookup::new()),
        Arc::new(AnalyticEphemeris),
    );
    let orchestrator = JobOrchestrator::new(db, Arc::new(pipeline), config.media_dir());

    let app = api_routes().with_state(Arc::new(AppState::new(orchestrator)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AstroMapError::Io {
            path: PathBuf::from(&addr),
            source: e,
        })?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AstroMapError::Io {
            path: PathBuf::from(&addr),
            source: e,
        })?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}
