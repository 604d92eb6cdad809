//! A ground observer on the WGS84 ellipsoid.

use glam::{DMat3, DVec3};

use super::time::ObservationTime;

const WGS84_EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;
const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
const METERS_PER_AU: f64 = 149_597_870_700.0;

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude_degrees: f64,
    pub longitude_degrees: f64,
}

impl Observer {
    pub fn new(latitude_degrees: f64, longitude_degrees: f64) -> Self {
        Self {
            latitude_degrees,
            longitude_degrees,
        }
    }

    fn local_sidereal_angle(&self, time: &ObservationTime) -> f64 {
        (time.gmst_degrees() + self.longitude_degrees).to_radians()
    }

    /// Geocentric position in AU on J2000 axes (sea level).
    pub fn geocentric_position(&self, time: &ObservationTime) -> DVec3 {
        let phi = self.latitude_degrees.to_radians();
        let theta = self.local_sidereal_angle(time);
        let (sin_phi, cos_phi) = phi.sin_cos();

        let one_minus_f = 1.0 - WGS84_FLATTENING;
        let c = 1.0 / (cos_phi * cos_phi + one_minus_f * one_minus_f * sin_phi * sin_phi).sqrt();
        let s = one_minus_f * one_minus_f * c;

        let a = WGS84_EQUATORIAL_RADIUS_M / METERS_PER_AU;
        let of_date = DVec3::new(
            a * c * cos_phi * theta.cos(),
            a * c * cos_phi * theta.sin(),
            a * s * sin_phi,
        );

        date_to_j2000(time) * of_date
    }

    /// Unit vector toward the local zenith (altitude 90°), J2000 axes.
    ///
    /// This is the ellipsoid normal, so its declination equals the
    /// geodetic latitude in the frame of date.
    pub fn zenith(&self, time: &ObservationTime) -> DVec3 {
        let phi = self.latitude_degrees.to_radians();
        let theta = self.local_sidereal_angle(time);
        let (sin_phi, cos_phi) = phi.sin_cos();

        let of_date = DVec3::new(cos_phi * theta.cos(), cos_phi * theta.sin(), sin_phi);

        (date_to_j2000(time) * of_date).normalize()
    }
}

/// IAU 1976 precession, rotating mean-of-date axes back onto J2000.
pub fn date_to_j2000(time: &ObservationTime) -> DMat3 {
    let t = time.centuries_since_j2000();

    let zeta = (2306.2181 * t + 0.30188 * t * t + 0.017998 * t * t * t) * ARCSEC_TO_RAD;
    let z = (2306.2181 * t + 1.09468 * t * t + 0.018203 * t * t * t) * ARCSEC_TO_RAD;
    let theta = (2004.3109 * t - 0.42665 * t * t - 0.041833 * t * t * t) * ARCSEC_TO_RAD;

    // J2000 -> date is R3(-z) R2(theta) R3(-zeta) in frame-rotation form;
    // glam rotates vectors, so each angle flips sign.
    let j2000_to_date =
        DMat3::from_rotation_z(z) * DMat3::from_rotation_y(-theta) * DMat3::from_rotation_z(zeta);

    j2000_to_date.transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn time(y: i32, m: u32, d: u32, h: u32) -> ObservationTime {
        ObservationTime::from_utc(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    #[test]
    fn test_precession_is_identity_at_j2000() {
        let m = date_to_j2000(&time(2000, 1, 1, 12));
        let v = DVec3::new(0.3, -0.4, 0.866);
        assert!((m * v - v).length() < 1e-9);
    }

    #[test]
    fn test_precession_is_a_rotation() {
        let m = date_to_j2000(&time(2024, 6, 21, 20));
        let identity = m * m.transpose();
        assert!(identity.abs_diff_eq(DMat3::IDENTITY, 1e-12));
        // About 0.34° of precession accumulates in 24 years.
        let pole = m * DVec3::Z;
        let angle = pole.angle_between(DVec3::Z).to_degrees();
        assert!((0.1..0.2).contains(&angle), "pole moved {angle}°");
    }

    #[test]
    fn test_zenith_declination_matches_latitude() {
        let observer = Observer::new(48.8566, 2.3522);
        let zenith = observer.zenith(&time(2000, 1, 1, 12));
        let dec = zenith.z.asin().to_degrees();
        assert!((dec - 48.8566).abs() < 1e-6);
    }

    #[test]
    fn test_geocentric_radius() {
        let equator = Observer::new(0.0, 0.0).geocentric_position(&time(2024, 1, 1, 0));
        let pole = Observer::new(90.0, 0.0).geocentric_position(&time(2024, 1, 1, 0));
        let equator_m = equator.length() * METERS_PER_AU;
        let pole_m = pole.length() * METERS_PER_AU;
        assert!((equator_m - 6_378_137.0).abs() < 1.0);
        assert!((pole_m - 6_356_752.3).abs() < 1.0);
    }

    #[test]
    fn test_zenith_sweeps_with_earth_rotation() {
        let observer = Observer::new(0.0, 0.0);
        let a = observer.zenith(&time(2024, 1, 1, 0));
        let b = observer.zenith(&time(2024, 1, 1, 6));
        // Six hours of rotation is ~90.25° of sidereal motion.
        let angle = a.angle_between(b).to_degrees();
        assert!((angle - 90.25).abs() < 0.1, "angle {angle}");
    }
}
