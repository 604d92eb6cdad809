//! Turns a place name and a local wall-clock time into an observation
//! context: a UTC instant plus the observer's geodetic position.

pub mod geocoder;
pub mod timezone;

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ResolveError;

pub use geocoder::{Coordinates, Geocoder, NominatimGeocoder};
pub use timezone::{TimezoneLookup, TzfTimezoneLookup};

/// Accepted layout for the local date-time input.
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Where and when the sky is observed.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationContext {
    pub instant: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone the local time was interpreted in.
    pub timezone: String,
}

pub struct Resolver {
    geocoder: Arc<dyn Geocoder>,
    timezones: Arc<dyn TimezoneLookup>,
}

impl Resolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, timezones: Arc<dyn TimezoneLookup>) -> Self {
        Self {
            geocoder,
            timezones,
        }
    }

    /// Resolves `place` and `local_datetime` (`YYYY-MM-DD HH:MM`) into an
    /// observation context. The date-time is validated before any lookup.
    pub async fn resolve(
        &self,
        place: &str,
        local_datetime: &str,
    ) -> Result<ObservationContext, ResolveError> {
        let naive = parse_local_datetime(local_datetime)?;

        let coords = self
            .geocoder
            .geocode(place)
            .await?
            .ok_or_else(|| ResolveError::UnknownLocation(place.to_string()))?;

        let timezone = self
            .timezones
            .timezone_at(coords.latitude, coords.longitude)
            .ok_or(ResolveError::UnknownTimezone {
                lat: coords.latitude,
                lon: coords.longitude,
            })?;

        let tz: Tz = timezone.parse().map_err(|_| ResolveError::UnknownTimezone {
            lat: coords.latitude,
            lon: coords.longitude,
        })?;

        let instant = localize(naive, tz)?;

        tracing::debug!(
            place,
            lat = coords.latitude,
            lon = coords.longitude,
            %timezone,
            %instant,
            "Resolved observation context"
        );

        Ok(ObservationContext {
            instant,
            latitude: coords.latitude,
            longitude: coords.longitude,
            timezone,
        })
    }
}

/// Parses a naive local date-time in the fixed `YYYY-MM-DD HH:MM` layout.
pub fn parse_local_datetime(input: &str) -> Result<NaiveDateTime, ResolveError> {
    NaiveDateTime::parse_from_str(input, LOCAL_DATETIME_FORMAT)
        .map_err(|_| ResolveError::InvalidTimeFormat(input.to_string()))
}

/// Interprets `naive` in `tz` and converts it to UTC. Wall-clock times that
/// fall into a DST gap or overlap are rejected.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, ResolveError> {
    tz.from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ResolveError::AmbiguousLocalTime {
            local: naive.format(LOCAL_DATETIME_FORMAT).to_string(),
            timezone: tz.name().to_string(),
        })
}
