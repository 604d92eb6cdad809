use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::config::{CaptionConfig, Config};
use crate::error::ComposeError;

const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The two caption lines printed under the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub location: String,
    pub when: String,
}

impl Caption {
    pub fn new(location: impl Into<String>, when: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            when: when.into(),
        }
    }
}

/// Places a rendered chart on the decorative template and prints the caption.
///
/// The template and font are read on every call so that replacing either
/// file on disk takes effect for the next map.
#[derive(Debug, Clone)]
pub struct Compositor {
    template_path: PathBuf,
    font_path: PathBuf,
    caption: CaptionConfig,
}

impl Compositor {
    pub fn new(template_path: PathBuf, font_path: PathBuf, caption: CaptionConfig) -> Self {
        Self {
            template_path,
            font_path,
            caption,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.template_path(), config.font_path(), config.caption.clone())
    }

    /// Composes the final image and writes it to `destination` as PNG.
    pub fn compose(
        &self,
        chart: &RgbaImage,
        caption: &Caption,
        destination: &Path,
    ) -> Result<(), ComposeError> {
        let composite = self.compose_image(chart, caption)?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ComposeError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        write_png(composite, destination)?;

        log::info!("Wrote sky map to {}", destination.display());
        Ok(())
    }

    /// Composes the final image in memory.
    pub fn compose_image(
        &self,
        chart: &RgbaImage,
        caption: &Caption,
    ) -> Result<image::RgbImage, ComposeError> {
        let _span = tracing::info_span!("render.compose").entered();

        let mut canvas = self.load_template()?;
        let font = self.load_font()?;
        let (width, height) = canvas.dimensions();

        let scaled = imageops::resize(
            chart,
            (chart.width() / 2).max(1),
            (chart.height() / 2).max(1),
            FilterType::CatmullRom,
        );
        let x = i64::from(width / 2) - i64::from(scaled.width() / 2);
        let y = i64::from(height / 7);
        imageops::overlay(&mut canvas, &scaled, x, y);

        let scale = PxScale::from(self.caption.font_size);
        let lines = [
            (caption.location.as_str(), self.caption.location_offset),
            (caption.when.as_str(), self.caption.datetime_offset),
        ];
        for (text, offset) in lines {
            let (text_width, _) = text_size(scale, &font, text);
            let x = (width / 2) as i32 - (text_width / 2) as i32;
            let y = height as i32 - offset as i32;
            draw_text_mut(&mut canvas, TEXT_COLOR, x, y, scale, &font, text);
        }

        Ok(DynamicImage::ImageRgba8(canvas).to_rgb8())
    }

    fn load_template(&self) -> Result<RgbaImage, ComposeError> {
        if !self.template_path.exists() {
            return Err(ComposeError::TemplateMissing(self.template_path.clone()));
        }
        let template = image::open(&self.template_path).map_err(|e| ComposeError::TemplateDecode {
            path: self.template_path.clone(),
            source: e,
        })?;

        // The template's own transparency is dropped, as on an opaque page.
        Ok(DynamicImage::ImageRgb8(template.to_rgb8()).to_rgba8())
    }

    fn load_font(&self) -> Result<FontVec, ComposeError> {
        let bytes = std::fs::read(&self.font_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ComposeError::FontMissing(self.font_path.clone()),
            _ => ComposeError::InvalidFont {
                path: self.font_path.clone(),
                reason: e.to_string(),
            },
        })?;

        FontVec::try_from_vec(bytes).map_err(|e| ComposeError::InvalidFont {
            path: self.font_path.clone(),
            reason: e.to_string(),
        })
    }
}

/// Encodes under a `.part` name and renames, so `destination` only ever
/// holds a complete PNG.
fn write_png(image: image::RgbImage, destination: &Path) -> Result<(), ComposeError> {
    let partial = destination.with_extension("png.part");

    let written = DynamicImage::ImageRgb8(image)
        .save_with_format(&partial, ImageFormat::Png)
        .map_err(|e| ComposeError::Write {
            path: partial.clone(),
            source: e,
        })
        .and_then(|()| {
            std::fs::rename(&partial, destination).map_err(|e| ComposeError::Publish {
                path: destination.to_path_buf(),
                source: e,
            })
        });

    if written.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    const SYSTEM_FONTS: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    fn system_font() -> Option<PathBuf> {
        SYSTEM_FONTS.iter().map(PathBuf::from).find(|p| p.exists())
    }

    fn write_template(dir: &TempDir, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join("template.png");
        let template = image::RgbImage::from_pixel(width, height, Rgb([10, 20, 40]));
        template.save(&path).unwrap();
        path
    }

    fn white_chart(side: u32) -> RgbaImage {
        RgbaImage::from_pixel(side, side, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_missing_template() {
        let dir = TempDir::new().unwrap();
        let compositor = Compositor::new(
            dir.path().join("nope.png"),
            dir.path().join("font.ttf"),
            CaptionConfig::default(),
        );

        let caption = Caption::new("Paris", "2024-01-01 22:00");
        let result = compositor.compose_image(&white_chart(10), &caption);
        match result {
            Err(ComposeError::TemplateMissing(path)) => assert!(path.ends_with("nope.png")),
            other => panic!("unexpected result: {:?}", other.map(|i| i.dimensions())),
        }
    }

    #[test]
    fn test_missing_font() {
        let dir = TempDir::new().unwrap();
        let template = write_template(&dir, 200, 400);
        let font = dir.path().join("missing.ttf");
        let compositor = Compositor::new(template, font, CaptionConfig::default());

        let caption = Caption::new("Paris", "2024-01-01 22:00");
        let result = compositor.compose_image(&white_chart(10), &caption);
        assert!(matches!(result, Err(ComposeError::FontMissing(_))));
    }

    #[test]
    fn test_invalid_font() {
        let dir = TempDir::new().unwrap();
        let template = write_template(&dir, 200, 400);
        let font = dir.path().join("broken.ttf");
        std::fs::write(&font, b"not a font").unwrap();
        let compositor = Compositor::new(template, font, CaptionConfig::default());

        let caption = Caption::new("Paris", "2024-01-01 22:00");
        let result = compositor.compose_image(&white_chart(10), &caption);
        assert!(matches!(result, Err(ComposeError::InvalidFont { .. })));
    }

    #[test]
    fn test_undecodable_template() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("template.png");
        std::fs::write(&template, b"garbage").unwrap();
        let font = dir.path().join("font.ttf");
        let compositor = Compositor::new(template, font, CaptionConfig::default());

        let caption = Caption::new("Paris", "2024-01-01 22:00");
        let result = compositor.compose_image(&white_chart(10), &caption);
        assert!(matches!(result, Err(ComposeError::TemplateDecode { .. })));
    }

    #[test]
    fn test_chart_is_halved_and_placed() {
        let Some(font) = system_font() else { return };
        let dir = TempDir::new().unwrap();
        let template = write_template(&dir, 700, 1400);
        let compositor = Compositor::new(template, font, CaptionConfig::default());

        let image = compositor
            .compose_image(&white_chart(400), &Caption::new("", ""))
            .unwrap();

        assert_eq!(image.dimensions(), (700, 1400));
        // Chart spans x in [250, 450), y in [200, 400).
        assert_eq!(*image.get_pixel(350, 300), Rgb([255, 255, 255]));
        assert_eq!(*image.get_pixel(251, 201), Rgb([255, 255, 255]));
        assert_eq!(*image.get_pixel(240, 300), Rgb([10, 20, 40]));
        assert_eq!(*image.get_pixel(350, 410), Rgb([10, 20, 40]));
    }

    #[test]
    fn test_caption_is_drawn_near_bottom() {
        let Some(font) = system_font() else { return };
        let dir = TempDir::new().unwrap();
        let template = write_template(&dir, 700, 1400);
        let compositor = Compositor::new(template, font, CaptionConfig::default());

        let caption = Caption::new("Paris, France", "2024-01-01 22:00");
        let image = compositor.compose_image(&white_chart(4), &caption).unwrap();

        let band_has_text = |top: u32, bottom: u32| {
            (top..bottom).any(|y| (0..700).any(|x| image.get_pixel(x, y)[0] > 200))
        };
        assert!(band_has_text(1400 - 285, 1400 - 245));
        assert!(band_has_text(1400 - 245, 1400 - 205));
        assert!(!band_has_text(1400 - 200, 1400));
    }

    #[test]
    fn test_compose_writes_png() {
        let Some(font) = system_font() else { return };
        let dir = TempDir::new().unwrap();
        let template = write_template(&dir, 300, 600);
        let compositor = Compositor::new(template, font, CaptionConfig::default());

        let destination = dir.path().join("media").join("sky_map_abcdefghij.png");
        let caption = Caption::new("Tokyo", "2024-07-07 21:30");
        compositor
            .compose(&white_chart(100), &caption, &destination)
            .unwrap();

        let written = image::open(&destination).unwrap();
        assert_eq!((written.width(), written.height()), (300, 600));
        assert!(!destination.with_extension("png.part").exists());
    }

    #[test]
    fn test_failed_publish_leaves_no_file_behind() {
        let dir = TempDir::new().unwrap();
        // A directory squatting on the name makes the final rename fail.
        let destination = dir.path().join("sky_map_abcdefghij.png");
        std::fs::create_dir(&destination).unwrap();

        let image = image::RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        let result = write_png(image, &destination);

        assert!(matches!(result, Err(ComposeError::Publish { .. })));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("sky_map_abcdefghij.png")]);
        assert!(destination.is_dir());
    }
}
