//! Timezone lookup from coordinates.

use tzf_rs::DefaultFinder;

const NAUTICAL_ZONE_PREFIX: &str = "Etc/";

/// Finds the IANA timezone name covering a coordinate pair.
pub trait TimezoneLookup: Send + Sync {
    fn timezone_at(&self, latitude: f64, longitude: f64) -> Option<String>;
}

/// Offline lookup against the polygon data bundled with `tzf-rs`.
///
/// Open water resolves to a nautical `Etc/GMT±N` zone in that data. Those
/// are reported as no zone so that ocean coordinates are rejected.
pub struct TzfTimezoneLookup {
    finder: DefaultFinder,
}

impl TzfTimezoneLookup {
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for TzfTimezoneLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneLookup for TzfTimezoneLookup {
    fn timezone_at(&self, latitude: f64, longitude: f64) -> Option<String> {
        let name = self.finder.get_tz_name(longitude, latitude);
        if name.is_empty() || name.starts_with(NAUTICAL_ZONE_PREFIX) {
            None
        } else {
            Some(name.to_string())
        }
    }
}
