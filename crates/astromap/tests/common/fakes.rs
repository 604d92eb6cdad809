//! Deterministic stand-ins for network and pipeline collaborators.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use astromap::error::{PipelineError, ResolveError};
use astromap::pipeline::{MapGenerator, MapRequest};
use astromap::resolver::{Coordinates, Geocoder, TimezoneLookup};

/// Geocoder that knows a fixed list of places.
pub struct FakeGeocoder {
    places: Vec<(&'static str, Coordinates)>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self {
            places: vec![
                (
                    "Paris, France",
                    Coordinates {
                        latitude: 48.8566,
                        longitude: 2.3522,
                    },
                ),
                (
                    "Tokyo, Japan",
                    Coordinates {
                        latitude: 35.6762,
                        longitude: 139.6503,
                    },
                ),
            ],
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ResolveError> {
        Ok(self
            .places
            .iter()
            .find(|(name, _)| *name == place)
            .map(|(_, coords)| *coords))
    }
}

/// Zone lookup that maps the fake places to their IANA zones.
pub struct FakeTimezones;

impl TimezoneLookup for FakeTimezones {
    fn timezone_at(&self, _latitude: f64, longitude: f64) -> Option<String> {
        if longitude > 100.0 {
            Some("Asia/Tokyo".to_string())
        } else {
            Some("Europe/Paris".to_string())
        }
    }
}

/// Generator that blocks until released, then succeeds.
pub struct GatedGenerator {
    pub gate: Arc<Notify>,
    pub calls: AtomicUsize,
}

impl GatedGenerator {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl MapGenerator for GatedGenerator {
    async fn generate(
        &self,
        _request: &MapRequest,
        _destination: &Path,
    ) -> Result<(), PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(())
    }
}

/// Generator that always fails at resolution.
pub struct FailingGenerator;

#[async_trait]
impl MapGenerator for FailingGenerator {
    async fn generate(
        &self,
        request: &MapRequest,
        _destination: &Path,
    ) -> Result<(), PipelineError> {
        Err(PipelineError::Resolve(ResolveError::UnknownLocation(
            request.location.clone(),
        )))
    }
}

/// Generator that writes a placeholder file and succeeds immediately.
pub struct TouchGenerator;

#[async_trait]
impl MapGenerator for TouchGenerator {
    async fn generate(
        &self,
        _request: &MapRequest,
        destination: &Path,
    ) -> Result<(), PipelineError> {
        let io_err = |e: std::io::Error| PipelineError::TaskFailed(e.to_string());
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(destination, b"png").map_err(io_err)?;
        Ok(())
    }
}
