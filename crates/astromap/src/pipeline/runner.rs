use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, info_span, Instrument, Span};

use crate::config::Config;
use crate::error::PipelineError;
use crate::render::{Caption, ChartRenderer, Compositor};
use crate::resolver::{Geocoder, ObservationContext, Resolver, TimezoneLookup};
use crate::sky::{Ephemeris, SkyProjector, StarCatalog};

use super::context::MapRequest;
use super::MapGenerator;

/// Where the star catalog comes from. Loaded lazily on the first map and
/// shared by every map after it.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    pub path: PathBuf,
    pub url: Option<String>,
}

/// The CPU-bound stages, shared with the blocking pool.
struct DrawStages {
    ephemeris: Arc<dyn Ephemeris>,
    projector: SkyProjector,
    renderer: ChartRenderer,
    compositor: Compositor,
}

/// Resolver → projector → renderer → compositor, in that order.
pub struct MapPipeline {
    resolver: Resolver,
    stages: Arc<DrawStages>,
    catalog_source: CatalogSource,
    catalog: OnceCell<Arc<StarCatalog>>,
}

impl MapPipeline {
    /// Production constructor. Builds the stages from config around the
    /// given collaborators.
    pub fn from_config(
        config: &Config,
        geocoder: Arc<dyn Geocoder>,
        timezones: Arc<dyn TimezoneLookup>,
        ephemeris: Arc<dyn Ephemeris>,
    ) -> Self {
        Self::new(
            Resolver::new(geocoder, timezones),
            ephemeris,
            SkyProjector::from_config(&config.chart),
            ChartRenderer::from_config(&config.chart),
            Compositor::from_config(config),
            CatalogSource {
                path: config.catalog_path(),
                url: config.catalog.url.clone(),
            },
        )
    }

    pub fn new(
        resolver: Resolver,
        ephemeris: Arc<dyn Ephemeris>,
        projector: SkyProjector,
        renderer: ChartRenderer,
        compositor: Compositor,
        catalog_source: CatalogSource,
    ) -> Self {
        Self {
            resolver,
            stages: Arc::new(DrawStages {
                ephemeris,
                projector,
                renderer,
                compositor,
            }),
            catalog_source,
            catalog: OnceCell::new(),
        }
    }

    /// Uses an already loaded catalog instead of reading `catalog_source`.
    pub fn with_catalog(self, catalog: Arc<StarCatalog>) -> Self {
        Self {
            catalog: OnceCell::new_with(Some(catalog)),
            ..self
        }
    }

    async fn star_catalog(&self) -> Result<Arc<StarCatalog>, PipelineError> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let source = &self.catalog_source;
                StarCatalog::load_or_fetch(&source.path, source.url.as_deref())
                    .await
                    .map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(catalog))
    }
}

impl DrawStages {
    /// Runs the projection, rendering and composition stages. CPU bound.
    fn draw(
        &self,
        context: &ObservationContext,
        catalog: &StarCatalog,
        caption: &Caption,
        destination: &Path,
    ) -> Result<(), PipelineError> {
        let stars = {
            let _step = info_span!("project").entered();
            let stars = self.projector.project(context, catalog, self.ephemeris.as_ref());
            debug!(count = stars.len(), "Projected stars");
            stars
        };

        let chart = {
            let _step = info_span!("render").entered();
            self.renderer.render(&stars)?
        };

        {
            let _step = info_span!("compose").entered();
            self.compositor.compose(&chart, caption, destination)?;
        }

        Ok(())
    }
}

#[async_trait]
impl MapGenerator for MapPipeline {
    async fn generate(
        &self,
        request: &MapRequest,
        destination: &Path,
    ) -> Result<(), PipelineError> {
        let span = info_span!("map_pipeline", map_id = %request.map_id);

        async {
            let context = self
                .resolver
                .resolve(&request.location, &request.when)
                .instrument(info_span!("resolve"))
                .await?;
            info!(
                instant = %context.instant,
                latitude = context.latitude,
                longitude = context.longitude,
                timezone = %context.timezone,
                "Resolved observation"
            );

            let catalog = self.star_catalog().await?;

            let stages = Arc::clone(&self.stages);
            let caption = Caption::new(request.location.clone(), request.when.clone());
            let destination = destination.to_path_buf();
            let parent = Span::current();

            tokio::task::spawn_blocking(move || {
                let _guard = parent.enter();
                stages.draw(&context, &catalog, &caption, &destination)
            })
            .await
            .map_err(|e| PipelineError::TaskFailed(e.to_string()))?
        }
        .instrument(span)
        .await
    }
}
