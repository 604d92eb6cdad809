pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod sky;
pub mod worker;

pub use config::{load_config, Config};
pub use db::{Database, DatabaseError};
pub use error::{
    AstroMapError, CatalogError, ComposeError, ConfigError, JobError, PipelineError, RenderError,
    ResolveError, Result,
};
pub use logging::init_logging;
pub use pipeline::{MapGenerator, MapPipeline, MapRequest};
pub use render::{Caption, ChartRenderer, Compositor};
pub use resolver::{NominatimGeocoder, ObservationContext, Resolver, TzfTimezoneLookup};
pub use sky::{AnalyticEphemeris, SkyProjector, StarCatalog};
pub use worker::{JobHandle, JobOrchestrator, MapJob, MapStatus};
