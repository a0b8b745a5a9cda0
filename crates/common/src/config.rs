//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GazekitError, GazekitResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where reports and images are written.
    pub output_dir: PathBuf,

    /// Page whose AOIs are used when none is given on the command line.
    #[serde(default = "default_page")]
    pub default_page: String,

    /// Fixation detection thresholds.
    pub detection: DetectionDefaults,

    /// Heatmap and scanpath rendering settings.
    pub render: RenderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default fixation detection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionDefaults {
    /// Maximum `(max_x - min_x) + (max_y - min_y)` of a fixation, in pixels.
    pub dispersion_threshold: f64,

    /// Minimum fixation duration in milliseconds.
    pub duration_threshold_ms: i64,
}

/// Default rendering parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDefaults {
    /// Heatmap canvas width in pixels.
    pub width: u32,

    /// Heatmap canvas height in pixels.
    pub height: u32,

    /// Gaussian spread of each fixation in pixels.
    pub sigma: f64,

    /// Optional screenshot drawn under the heatmap.
    #[serde(default)]
    pub background: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "gazekit=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            default_page: default_page(),
            detection: DetectionDefaults::default(),
            render: RenderDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DetectionDefaults {
    fn default() -> Self {
        Self {
            dispersion_threshold: 100.0,
            duration_threshold_ms: 200,
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            sigma: 50.0,
            background: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Load config from `path`, failing when it is missing or malformed.
    pub fn try_load_from(path: &Path) -> GazekitResult<Self> {
        if !path.exists() {
            return Err(GazekitError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            GazekitError::config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Save config to the standard location.
    pub fn save(&self) -> GazekitResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> GazekitResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn default_page() -> String {
    gazekit_session_model::aoi::DEFAULT_PAGE.to_string()
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("gazekit").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_analysis_settings() {
        let config = AppConfig::default();
        assert_eq!(config.detection.dispersion_threshold, 100.0);
        assert_eq!(config.detection.duration_threshold_ms, 200);
        assert_eq!(config.render.width, 1024);
        assert_eq!(config.render.height, 768);
        assert_eq!(config.default_page, "home");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.detection.duration_threshold_ms = 120;
        config.default_page = "checkout".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.detection.duration_threshold_ms, 120);
        assert_eq!(loaded.default_page, "checkout");
    }

    #[test]
    fn unparsable_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.detection.duration_threshold_ms, 200);
    }

    #[test]
    fn strict_load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            AppConfig::try_load_from(&missing),
            Err(GazekitError::FileNotFound { .. })
        ));

        let broken = dir.path().join("config.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let err = AppConfig::try_load_from(&broken).unwrap_err();
        assert!(matches!(err, GazekitError::Config { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn legacy_config_without_page_uses_home() {
        let mut value = serde_json::to_value(AppConfig::default()).unwrap();
        value.as_object_mut().unwrap().remove("default_page");

        let parsed: AppConfig = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.default_page, "home");
    }
}
