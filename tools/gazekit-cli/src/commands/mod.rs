//! Subcommand implementations and the input handling they share.

pub mod analyze;
pub mod detect;
pub mod init;
pub mod layout;
pub mod render;

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use gazekit_common::config::AppConfig;
use gazekit_common::error::{GazekitError, GazekitResult};
use gazekit_processing_core::fixation::{DetectorConfig, FixationDetector};
use gazekit_session_model::aoi::AoiRegistry;
use gazekit_session_model::fixation::{read_fixations_csv, Fixation};
use gazekit_session_model::sample::load_samples;

/// Where fixations come from and how they are detected.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Gaze sample CSV with x, y and timestamp columns
    pub input: PathBuf,

    /// Keep only samples whose `page` column equals this value
    #[arg(long)]
    pub page_filter: Option<String>,

    /// Read the input as an already-detected fixation CSV
    #[arg(long)]
    pub from_fixations: bool,

    /// Maximum dispersion in pixels
    #[arg(long)]
    pub dispersion: Option<f64>,

    /// Minimum fixation duration in milliseconds
    #[arg(long)]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FixationFormat {
    Csv,
    Json,
}

impl FixationFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotKind {
    Heatmap,
    Scanpath,
}

impl PlotKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Heatmap => "heatmap",
            Self::Scanpath => "scanpath",
        }
    }
}

/// Detection thresholds from the command line, falling back to config.
pub fn detector_config(config: &AppConfig, input: &InputArgs) -> DetectorConfig {
    DetectorConfig {
        dispersion_threshold: input
            .dispersion
            .unwrap_or(config.detection.dispersion_threshold),
        duration_threshold_ms: input
            .duration
            .unwrap_or(config.detection.duration_threshold_ms),
    }
}

/// Load or detect the fixations named by `input`.
pub fn load_fixations(config: &AppConfig, input: &InputArgs) -> GazekitResult<Vec<Fixation>> {
    if !input.input.exists() {
        return Err(GazekitError::FileNotFound {
            path: input.input.clone(),
        });
    }

    if input.from_fixations {
        if input.page_filter.is_some() {
            tracing::warn!("--page-filter has no effect on fixation input");
        }
        let file = File::open(&input.input)?;
        let fixations = read_fixations_csv(file)?;
        println!("  Loaded {} fixations", fixations.len());
        return Ok(fixations);
    }

    let samples = load_samples(&input.input, input.page_filter.as_deref())?;
    println!("  Loaded {} gaze samples", samples.len());

    let detector = FixationDetector::new(detector_config(config, input));
    let (fixations, stats) = detector.detect_with_stats(&samples);
    println!(
        "  Detected {} fixations ({} groups, {} discarded as too short)",
        stats.fixations, stats.groups, stats.discarded
    );

    Ok(fixations)
}

/// Load an AOI layout, or the built-in storefront layout when none is given.
pub fn load_registry(path: Option<&Path>) -> GazekitResult<AoiRegistry> {
    match path {
        Some(path) if !path.exists() => Err(GazekitError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Some(path) => Ok(AoiRegistry::load(path)?),
        None => {
            tracing::debug!("No AOI layout given; using the storefront default");
            Ok(AoiRegistry::storefront_default())
        }
    }
}

/// Explicit output path, or `<output_dir>/<file_name>`.
pub fn output_path(config: &AppConfig, explicit: Option<PathBuf>, file_name: &str) -> PathBuf {
    explicit.unwrap_or_else(|| config.output_dir.join(file_name))
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
