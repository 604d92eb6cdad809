use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let chart = &config.chart;

    if chart.dpi == 0 {
        return Err(ConfigError::Validation {
            message: "chart.dpi must be greater than zero".to_string(),
        });
    }

    if !chart.chart_size_inches.is_finite() || chart.chart_size_inches <= 0.0 {
        return Err(ConfigError::Validation {
            message: format!(
                "chart.chart_size_inches must be positive, got {}",
                chart.chart_size_inches
            ),
        });
    }

    if !chart.max_marker_size.is_finite() || chart.max_marker_size <= 0.0 {
        return Err(ConfigError::Validation {
            message: format!(
                "chart.max_marker_size must be positive, got {}",
                chart.max_marker_size
            ),
        });
    }

    if !chart.limiting_magnitude.is_finite() {
        return Err(ConfigError::Validation {
            message: "chart.limiting_magnitude must be a finite number".to_string(),
        });
    }

    let caption = &config.caption;

    if !caption.font_size.is_finite() || caption.font_size <= 0.0 {
        return Err(ConfigError::Validation {
            message: format!("caption.font_size must be positive, got {}", caption.font_size),
        });
    }

    // The location line sits above the date-time line.
    if caption.location_offset <= caption.datetime_offset {
        return Err(ConfigError::Validation {
            message: format!(
                "caption.location_offset ({}) must be greater than caption.datetime_offset ({})",
                caption.location_offset, caption.datetime_offset
            ),
        });
    }

    Ok(())
}
