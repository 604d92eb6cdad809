//! Place-name geocoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::error::ResolveError;

/// Geodetic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Turns a free-form place name into coordinates.
///
/// `Ok(None)` means the lookup succeeded but found no match.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ResolveError>;
}

/// Default connect timeout for geocoding requests (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Geocoder backed by a Nominatim search endpoint.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ResolveError::Geocoding(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ResolveError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| ResolveError::Geocoding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ResolveError::Geocoding(format!("HTTP {}: {}", status, body)));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| ResolveError::Geocoding(format!("Invalid response: {}", e)))?;

        let Some(first) = places.into_iter().next() else {
            return Ok(None);
        };

        tracing::debug!(place, matched = %first.display_name, "Geocoded location");

        parse_coordinates(&first.lat, &first.lon).map(Some)
    }
}

fn parse_coordinates(lat: &str, lon: &str) -> Result<Coordinates, ResolveError> {
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| ResolveError::Geocoding(format!("Invalid latitude '{}'", lat)))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|_| ResolveError::Geocoding(format!("Invalid longitude '{}'", lon)))?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(ResolveError::Geocoding(format!(
            "Coordinates out of range: {}, {}",
            latitude, longitude
        )));
    }

    Ok(Coordinates {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nominatim_payload() {
        let body = r#"[{
            "place_id": 1,
            "lat": "48.8588897",
            "lon": "2.3200410",
            "display_name": "Paris, Île-de-France, France"
        }]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        let coords = parse_coordinates(&places[0].lat, &places[0].lon).unwrap();
        assert!((coords.latitude - 48.8588897).abs() < 1e-9);
        assert!((coords.longitude - 2.3200410).abs() < 1e-9);
    }

    #[test]
    fn test_empty_payload_has_no_match() {
        let places: Vec<NominatimPlace> = serde_json::from_str("[]").unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_reject_garbage_coordinates() {
        assert!(matches!(
            parse_coordinates("north", "2.0"),
            Err(ResolveError::Geocoding(_))
        ));
        assert!(matches!(
            parse_coordinates("91.0", "2.0"),
            Err(ResolveError::Geocoding(_))
        ));
    }

    #[test]
    fn test_client_builds_from_config() {
        assert!(NominatimGeocoder::new(&GeocoderConfig::default()).is_ok());
    }
}
