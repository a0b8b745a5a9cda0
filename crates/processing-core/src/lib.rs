//! Gazekit Processing Core
//!
//! Turns gaze data into analysis results:
//! - **Fixation detection:** Dispersion-threshold clustering of raw samples
//! - **Metrics:** TTFF, dwell time and per-AOI statistics
//! - **Heatmap:** Duration-weighted Gaussian density grid
//! - **Scanpath:** Fixations in viewing order with saccades
//!
//! This crate is pure computation with no I/O and no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod fixation;
pub mod heatmap;
pub mod metrics;
pub mod scanpath;

pub use fixation::{detect_fixations, DetectorConfig, FixationDetector};
pub use heatmap::{HeatmapConfig, HeatmapGrid};
pub use metrics::MetricsCalculator;
pub use scanpath::Scanpath;
