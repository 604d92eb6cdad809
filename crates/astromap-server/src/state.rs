use astromap::worker::JobOrchestrator;

pub struct AppState {
    pub orchestrator: JobOrchestrator,
}

impl AppState {
    pub fn new(orchestrator: JobOrchestrator) -> Self {
        Self { orchestrator }
    }
}
