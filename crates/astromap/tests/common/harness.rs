//! Test harness for isolated test execution.
//!
//! `TestHarness` lays out a throwaway data root the way the service expects
//! it (template, fonts, star catalog, media directory) and builds a
//! `Config` pointing at it.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgb, RgbImage};
use tempfile::TempDir;

use astromap::config::{ChartConfig, Config, PathsConfig};
use astromap::pipeline::MapPipeline;
use astromap::sky::AnalyticEphemeris;

use super::fakes::{FakeGeocoder, FakeTimezones};

pub const TEMPLATE_WIDTH: u32 = 400;
pub const TEMPLATE_HEIGHT: u32 = 800;
pub const TEMPLATE_COLOR: Rgb<u8> = Rgb([12, 24, 48]);

/// A handful of bright Hipparcos rows: Sirius, Canopus, Vega, Polaris, Betelgeuse.
pub const CATALOG: &str = "\
H|       32349| |06 45 08.92|-16 42 58.0|-1.44| |H|101.28854105|-16.71314306| |379.21|-546.01|-1223.08
H|       30438| |06 23 57.11|-52 41 44.4|-0.62| |H|095.98787763|-52.69571799| | 10.43|  19.99|   23.67
H|       91262| |18 36 56.19|+38 46 58.8| 0.03| |H|279.23410832|+38.78299311| |128.93| 201.02|  287.46
H|       11767| |02 31 47.08|+89 15 50.9| 2.02| |H|037.94614689|+89.26413805| |  7.56|  44.22|  -11.74
H|       27989| |05 55 10.29|+07 24 25.3| 0.45| |H|088.79287161|+07.40703634| |  7.63|  27.33|   10.86
";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// First TrueType font found on this machine, if any.
pub fn system_font() -> Option<PathBuf> {
    SYSTEM_FONTS.iter().map(PathBuf::from).find(|p| p.exists())
}

pub struct TestHarness {
    temp_dir: TempDir,
    pub config: Config,
}

impl TestHarness {
    /// Data root with template and catalog but no font.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let config = Config {
            paths: PathsConfig::rooted_at(temp_dir.path()),
            chart: ChartConfig {
                chart_size_inches: 2.0,
                dpi: 100,
                ..ChartConfig::default()
            },
            ..Config::default()
        };

        let harness = Self { temp_dir, config };
        harness.write_template();
        harness.write_catalog(CATALOG);
        harness
    }

    /// Data root with a usable caption font, or `None` when the machine has
    /// no TrueType font to copy.
    pub fn with_font() -> Option<Self> {
        let font = system_font()?;
        let harness = Self::new();
        let target = harness.config.font_path();
        std::fs::create_dir_all(target.parent()?).expect("Failed to create fonts dir");
        std::fs::copy(font, &target).expect("Failed to copy font");
        Some(harness)
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_template(&self) {
        let path = self.config.template_path();
        std::fs::create_dir_all(path.parent().expect("template has a parent"))
            .expect("Failed to create template dir");
        RgbImage::from_pixel(TEMPLATE_WIDTH, TEMPLATE_HEIGHT, TEMPLATE_COLOR)
            .save(&path)
            .expect("Failed to write template");
    }

    pub fn write_catalog(&self, content: &str) {
        let path = self.config.catalog_path();
        std::fs::create_dir_all(path.parent().expect("catalog has a parent"))
            .expect("Failed to create data dir");
        std::fs::write(&path, content).expect("Failed to write catalog");
    }

    /// Production pipeline wired to fake geocoding and zone lookup.
    pub fn pipeline(&self) -> MapPipeline {
        let mut config = self.config.clone();
        config.catalog.url = None;
        MapPipeline::from_config(
            &config,
            Arc::new(FakeGeocoder::new()),
            Arc::new(FakeTimezones),
            Arc::new(AnalyticEphemeris),
        )
    }

    /// Files currently in the media directory.
    pub fn media_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.config.media_dir()) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}
