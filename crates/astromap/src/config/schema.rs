use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hipparcos main catalogue, as served by CDS.
pub const HIPPARCOS_URL: &str = "https://cdsarc.cds.unistra.fr/ftp/cats/I/239/hip_main.dat";

/// Nominatim free-form search endpoint.
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub caption: CaptionConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Path of the background template image.
    pub fn template_path(&self) -> PathBuf {
        self.paths
            .resolve(&self.paths.template_dir)
            .join(&self.caption.template_file)
    }

    /// Path of the caption font.
    pub fn font_path(&self) -> PathBuf {
        self.paths
            .resolve(&self.paths.fonts_dir)
            .join(&self.caption.font_file)
    }

    /// Path of the local star catalog cache.
    pub fn catalog_path(&self) -> PathBuf {
        self.paths
            .resolve(&self.paths.data_dir)
            .join(&self.catalog.file_name)
    }

    pub fn media_dir(&self) -> PathBuf {
        self.paths.resolve(&self.paths.media_dir)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.paths.resolve(&self.paths.logs_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.paths.resolve(&self.paths.database)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Filesystem layout. Relative entries are resolved against `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("Data/Fonts")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("Data/TemplateSkyMap")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("Data/SkyfieldFiles")
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("Media/SkyMaps")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("Data/Logs")
}

fn default_database() -> PathBuf {
    PathBuf::from("Data/astromap.db")
}

impl PathsConfig {
    /// Layout with every directory rooted at `root`.
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            fonts_dir: default_fonts_dir(),
            template_dir: default_template_dir(),
            data_dir: default_data_dir(),
            media_dir: default_media_dir(),
            logs_dir: default_logs_dir(),
            database: default_database(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_size_inches")]
    pub chart_size_inches: f64,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Marker area (points²) of a magnitude-0 star.
    #[serde(default = "default_max_marker_size")]
    pub max_marker_size: f64,
    /// Faintest magnitude still plotted.
    #[serde(default = "default_limiting_magnitude")]
    pub limiting_magnitude: f64,
}

fn default_chart_size_inches() -> f64 {
    10.0
}

fn default_dpi() -> u32 {
    300
}

fn default_max_marker_size() -> f64 {
    100.0
}

fn default_limiting_magnitude() -> f64 {
    10.0
}

impl ChartConfig {
    /// Side of the square chart canvas in pixels.
    pub fn canvas_side(&self) -> u32 {
        (self.chart_size_inches * f64::from(self.dpi)).round() as u32
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_size_inches: default_chart_size_inches(),
            dpi: default_dpi(),
            max_marker_size: default_max_marker_size(),
            limiting_magnitude: default_limiting_magnitude(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    #[serde(default = "default_template_file")]
    pub template_file: String,
    #[serde(default = "default_font_file")]
    pub font_file: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Distance of the location line from the bottom edge, in pixels.
    #[serde(default = "default_location_offset")]
    pub location_offset: u32,
    /// Distance of the date-time line from the bottom edge, in pixels.
    #[serde(default = "default_datetime_offset")]
    pub datetime_offset: u32,
}

fn default_template_file() -> String {
    "TemplateSkyMap.png".to_string()
}

fn default_font_file() -> String {
    "OpenSans-Italic.ttf".to_string()
}

fn default_font_size() -> f32 {
    30.0
}

fn default_location_offset() -> u32 {
    285
}

fn default_datetime_offset() -> u32 {
    245
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            template_file: default_template_file(),
            font_file: default_font_file(),
            font_size: default_font_size(),
            location_offset: default_location_offset(),
            datetime_offset: default_datetime_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_geocoder_url() -> String {
    NOMINATIM_URL.to_string()
}

fn default_user_agent() -> String {
    "myGeocoder".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_file")]
    pub file_name: String,
    /// Download source used when the local file is missing.
    #[serde(default = "default_catalog_url")]
    pub url: Option<String>,
}

fn default_catalog_file() -> String {
    "hip_main.dat".to_string()
}

fn default_catalog_url() -> Option<String> {
    Some(HIPPARCOS_URL.to_string())
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            file_name: default_catalog_file(),
            url: default_catalog_url(),
        }
    }
}
