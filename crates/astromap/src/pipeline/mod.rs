pub mod context;
pub mod runner;

use std::path::Path;

use async_trait::async_trait;

pub use crate::error::PipelineError;
pub use context::MapRequest;
pub use runner::{CatalogSource, MapPipeline};

/// Produces the finished map image for a request at `destination`.
#[async_trait]
pub trait MapGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &MapRequest,
        destination: &Path,
    ) -> Result<(), PipelineError>;
}
