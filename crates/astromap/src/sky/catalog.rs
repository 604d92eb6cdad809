//! Star catalog loading (Hipparcos main catalogue format).

use std::path::Path;

use glam::DVec3;

use crate::error::CatalogError;

/// Julian date of the Hipparcos catalogue epoch, J1991.25.
pub const HIPPARCOS_EPOCH_JD: f64 = 2_448_349.0625;

/// Parallax substituted for non-positive catalogue values.
const MIN_PARALLAX_MAS: f64 = 1.0e-6;

const MAS_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3_600_000.0);

// Column positions in `hip_main.dat`.
const COL_HIP: usize = 1;
const COL_VMAG: usize = 5;
const COL_RA_DEG: usize = 8;
const COL_DEC_DEG: usize = 9;
const COL_PARALLAX: usize = 11;
const COL_PM_RA: usize = 12;
const COL_PM_DEC: usize = 13;

#[derive(Debug, Clone, PartialEq)]
pub struct StarRecord {
    pub hip: u32,
    pub magnitude: f64,
    pub ra_degrees: f64,
    pub dec_degrees: f64,
    pub parallax_mas: f64,
    /// Proper motion in RA, already multiplied by cos(dec).
    pub ra_mas_per_year: f64,
    pub dec_mas_per_year: f64,
}

impl StarRecord {
    /// Barycentric position in AU after `years` of proper motion from the
    /// catalogue epoch.
    pub fn position_au(&self, years: f64) -> DVec3 {
        let parallax_mas = if self.parallax_mas > 0.0 {
            self.parallax_mas
        } else {
            MIN_PARALLAX_MAS
        };
        let distance_au = 1.0 / (parallax_mas * MAS_TO_RAD);

        let (sin_ra, cos_ra) = self.ra_degrees.to_radians().sin_cos();
        let (sin_dec, cos_dec) = self.dec_degrees.to_radians().sin_cos();

        let direction = DVec3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec);
        let east = DVec3::new(-sin_ra, cos_ra, 0.0);
        let north = DVec3::new(-sin_dec * cos_ra, -sin_dec * sin_ra, cos_dec);

        let drift = (east * self.ra_mas_per_year + north * self.dec_mas_per_year) * MAS_TO_RAD;

        (direction + drift * years) * distance_au
    }
}

/// Ordered, read-only star list.
#[derive(Debug, Clone, Default)]
pub struct StarCatalog {
    stars: Vec<StarRecord>,
}

impl StarCatalog {
    pub fn new(stars: Vec<StarRecord>) -> Self {
        Self { stars }
    }

    pub fn stars(&self) -> &[StarRecord] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Parses pipe-delimited Hipparcos records. Rows without a position or a
    /// magnitude are skipped; missing parallax or proper motion reads as zero.
    pub fn parse_hipparcos(content: &str) -> Result<Self, CatalogError> {
        let mut stars = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            let fields: Vec<&str> = line.split('|').collect();
            if fields.len() <= COL_PM_DEC {
                return Err(CatalogError::Parse {
                    line: line_no,
                    reason: format!(
                        "expected at least {} fields, found {}",
                        COL_PM_DEC + 1,
                        fields.len()
                    ),
                });
            }

            let (Some(magnitude), Some(ra_degrees), Some(dec_degrees)) = (
                number(&fields, COL_VMAG, line_no)?,
                number(&fields, COL_RA_DEG, line_no)?,
                number(&fields, COL_DEC_DEG, line_no)?,
            ) else {
                continue;
            };

            let hip = fields[COL_HIP]
                .trim()
                .parse::<u32>()
                .map_err(|_| CatalogError::Parse {
                    line: line_no,
                    reason: format!("invalid HIP number '{}'", fields[COL_HIP].trim()),
                })?;

            stars.push(StarRecord {
                hip,
                magnitude,
                ra_degrees,
                dec_degrees,
                parallax_mas: number(&fields, COL_PARALLAX, line_no)?.unwrap_or(0.0),
                ra_mas_per_year: number(&fields, COL_PM_RA, line_no)?.unwrap_or(0.0),
                dec_mas_per_year: number(&fields, COL_PM_DEC, line_no)?.unwrap_or(0.0),
            });
        }

        Ok(Self { stars })
    }

    /// Loads a catalogue file from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path).map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let catalog = Self::parse_hipparcos(&String::from_utf8_lossy(&bytes))?;
        if catalog.is_empty() {
            return Err(CatalogError::Empty(path.to_path_buf()));
        }

        log::info!("Loaded {} stars from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Loads the catalogue from `path`, downloading it from `url` first when
    /// the file does not exist yet.
    pub async fn load_or_fetch(path: &Path, url: Option<&str>) -> Result<Self, CatalogError> {
        if !path.exists() {
            if let Some(url) = url {
                download(url, path).await?;
            }
        }

        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::load(&owned))
            .await
            .map_err(|e| CatalogError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::other(e.to_string()),
            })?
    }
}

fn number(fields: &[&str], column: usize, line: usize) -> Result<Option<f64>, CatalogError> {
    let raw = fields[column].trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| CatalogError::Parse {
            line,
            reason: format!("column {} is not a number: '{}'", column, raw),
        })
}

async fn download(url: &str, path: &Path) -> Result<(), CatalogError> {
    log::info!("Downloading star catalog from {}", url);

    let fail = |reason: String| CatalogError::Download {
        url: url.to_string(),
        reason,
    };

    let response = reqwest::get(url).await.map_err(|e| fail(e.to_string()))?;
    if !response.status().is_success() {
        return Err(fail(format!("HTTP {}", response.status())));
    }
    let body = response.bytes().await.map_err(|e| fail(e.to_string()))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CatalogError::Read {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    // Write under a temporary name so a partial download never looks complete.
    let partial = path.with_extension("part");
    tokio::fs::write(&partial, &body)
        .await
        .map_err(|e| CatalogError::Read {
            path: partial.clone(),
            source: e,
        })?;
    tokio::fs::rename(&partial, path)
        .await
        .map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
