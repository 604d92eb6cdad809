pub mod job;
pub mod orchestrator;

pub use job::{JobHandle, MapJob, MapStatus};
pub use orchestrator::{artifact_name, JobOrchestrator};
