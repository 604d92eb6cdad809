use glam::DVec3;

use super::catalog::{StarCatalog, HIPPARCOS_EPOCH_JD};
use super::ephemeris::Ephemeris;
use super::observer::Observer;
use super::projection::StereographicProjection;
use super::time::ObservationTime;
use crate::config::ChartConfig;
use crate::resolver::ObservationContext;

/// Marker area for a star of the given magnitude. Each magnitude step is a
/// brightness factor of 10^0.4.
pub fn marker_size(max_marker_size: f64, magnitude: f64) -> f64 {
    max_marker_size * 10f64.powf(magnitude / -2.5)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedStar {
    pub hip: u32,
    pub x: f64,
    pub y: f64,
    pub magnitude: f64,
    pub marker_size: f64,
}

impl ProjectedStar {
    /// Whether the star lies on or inside the horizon circle.
    pub fn above_horizon(&self) -> bool {
        self.x * self.x + self.y * self.y <= 1.0
    }
}

/// Stars projected onto the zenith-centred plane, in catalog order.
#[derive(Debug, Clone)]
pub struct ProjectedStarSet {
    pub center: DVec3,
    pub limiting_magnitude: f64,
    pub stars: Vec<ProjectedStar>,
}

impl ProjectedStarSet {
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SkyProjector {
    limiting_magnitude: f64,
    max_marker_size: f64,
}

impl SkyProjector {
    pub fn new(limiting_magnitude: f64, max_marker_size: f64) -> Self {
        Self {
            limiting_magnitude,
            max_marker_size,
        }
    }

    pub fn from_config(config: &ChartConfig) -> Self {
        Self::new(config.limiting_magnitude, config.max_marker_size)
    }

    /// Projects every catalog star at or brighter than the limiting magnitude
    /// as seen from the observer. Stars below the horizon keep their
    /// coordinates (radius > 1); the renderer clips them. Stars whose
    /// projection is not finite (exactly at the nadir) are dropped.
    pub fn project(
        &self,
        context: &ObservationContext,
        catalog: &StarCatalog,
        ephemeris: &dyn Ephemeris,
    ) -> ProjectedStarSet {
        let time = ObservationTime::from_utc(context.instant);
        let observer = Observer::new(context.latitude, context.longitude);

        let observer_position =
            ephemeris.earth_barycentric(&time) + observer.geocentric_position(&time);
        let center = observer.zenith(&time);
        let projection = StereographicProjection::new(center);
        let years = time.years_since(HIPPARCOS_EPOCH_JD);

        let stars = catalog
            .stars()
            .iter()
            .filter(|star| star.magnitude <= self.limiting_magnitude)
            .filter_map(|star| {
                let direction = star.position_au(years) - observer_position;
                let (x, y) = projection.project(direction);
                if !(x.is_finite() && y.is_finite()) {
                    return None;
                }
                Some(ProjectedStar {
                    hip: star.hip,
                    x,
                    y,
                    magnitude: star.magnitude,
                    marker_size: marker_size(self.max_marker_size, star.magnitude),
                })
            })
            .collect();

        ProjectedStarSet {
            center,
            limiting_magnitude: self.limiting_magnitude,
            stars,
        }
    }
}
