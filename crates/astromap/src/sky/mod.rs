//! Sky geometry: time scales, observer placement, star catalog and the
//! zenith-centred stereographic projection.

pub mod catalog;
pub mod ephemeris;
pub mod observer;
pub mod projection;
pub mod projector;
pub mod time;

pub use catalog::{StarCatalog, StarRecord, HIPPARCOS_EPOCH_JD};
pub use ephemeris::{AnalyticEphemeris, Ephemeris};
pub use observer::Observer;
pub use projection::StereographicProjection;
pub use projector::{marker_size, ProjectedStar, ProjectedStarSet, SkyProjector};
pub use time::ObservationTime;
