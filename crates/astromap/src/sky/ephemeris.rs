//! Solar-system positions needed to place the observer.

use glam::DVec3;

use super::time::{ObservationTime, J2000};

/// Source of the Earth's position at a given time.
pub trait Ephemeris: Send + Sync {
    /// Barycentric position of the Earth in AU, equatorial axes.
    fn earth_barycentric(&self, time: &ObservationTime) -> DVec3;
}

/// Low-precision solar coordinates from the Astronomical Almanac,
/// accurate to about 0.01° for the years 1950–2050. The Sun–barycentre
/// offset is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl Ephemeris for AnalyticEphemeris {
    fn earth_barycentric(&self, time: &ObservationTime) -> DVec3 {
        let n = time.jd_tt - J2000;

        let mean_longitude = (280.460 + 0.985_647_4 * n).to_radians();
        let mean_anomaly = (357.528 + 0.985_600_3 * n).to_radians();

        let ecliptic_longitude = mean_longitude
            + (1.915 * mean_anomaly.sin() + 0.020 * (2.0 * mean_anomaly).sin()).to_radians();
        let distance =
            1.000_14 - 0.016_71 * mean_anomaly.cos() - 0.000_14 * (2.0 * mean_anomaly).cos();
        let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

        let (sin_l, cos_l) = ecliptic_longitude.sin_cos();
        let sun_geocentric = DVec3::new(
            distance * cos_l,
            distance * obliquity.cos() * sin_l,
            distance * obliquity.sin() * sin_l,
        );

        -sun_geocentric
    }
}
