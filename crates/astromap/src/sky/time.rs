//! Observation time scales.

use chrono::{DateTime, Utc};

/// Julian date of the J2000.0 epoch.
pub const J2000: f64 = 2_451_545.0;

const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// TT − UTC since 2017: 37 leap seconds plus the 32.184 s TAI offset.
const TT_MINUS_UTC_SECONDS: f64 = 69.184;

/// A UTC instant expressed on the scales the sky computation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationTime {
    pub utc: DateTime<Utc>,
    /// Julian date on the UTC scale (UT1 is approximated by UTC).
    pub jd_utc: f64,
    /// Julian date on the Terrestrial Time scale.
    pub jd_tt: f64,
}

impl ObservationTime {
    pub fn from_utc(utc: DateTime<Utc>) -> Self {
        let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9;
        let jd_utc = UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY;
        let jd_tt = jd_utc + TT_MINUS_UTC_SECONDS / SECONDS_PER_DAY;

        Self { utc, jd_utc, jd_tt }
    }

    /// Julian centuries of TT since J2000.
    pub fn centuries_since_j2000(&self) -> f64 {
        (self.jd_tt - J2000) / 36_525.0
    }

    /// Julian years of TT elapsed since the given epoch.
    pub fn years_since(&self, epoch_jd: f64) -> f64 {
        (self.jd_tt - epoch_jd) / 365.25
    }

    /// Greenwich mean sidereal time in degrees, `[0, 360)`.
    pub fn gmst_degrees(&self) -> f64 {
        let d = self.jd_utc - J2000;
        let t = d / 36_525.0;
        let gmst = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0;
        gmst.rem_euclid(360.0)
    }
}
