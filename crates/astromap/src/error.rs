use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AstroMapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Job error: {0}")]
    Job(#[from] JobError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid date-time '{0}', expected YYYY-MM-DD HH:MM")]
    InvalidTimeFormat(String),

    #[error("No coordinates found for location '{0}'")]
    UnknownLocation(String),

    #[error("No timezone found at latitude {lat}, longitude {lon}")]
    UnknownTimezone { lat: f64, lon: f64 },

    #[error("Local time '{local}' is ambiguous or does not exist in {timezone}")]
    AmbiguousLocalTime { local: String, timezone: String },

    #[error("Geocoding request failed: {0}")]
    Geocoding(String),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read star catalog '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to download star catalog from {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Malformed catalog line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Star catalog '{0}' contains no usable stars")]
    Empty(PathBuf),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid chart canvas size: {side}px")]
    InvalidCanvas { side: u32 },
}

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Background template not found: {0}")]
    TemplateMissing(PathBuf),

    #[error("Failed to decode template '{path}': {source}")]
    TemplateDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Caption font not found: {0}")]
    FontMissing(PathBuf),

    #[error("Invalid font file '{path}': {reason}")]
    InvalidFont { path: PathBuf, reason: String },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write composite '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to move composite into place at '{path}': {source}")]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Star data unavailable: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Composition failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Job store error: {0}")]
    Store(#[from] crate::db::DatabaseError),

    #[error("No map found with id '{0}'")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, AstroMapError>;
