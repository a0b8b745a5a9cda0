//! Dispersion-threshold fixation detection.
//!
//! # Algorithm
//!
//! 1. **Sort** samples by timestamp (stable, so ties keep input order).
//! 2. **Grow** one open group: a sample joins the group when the group's
//!    bounding box, including the sample, has `width + height` at most
//!    the dispersion threshold.
//! 3. **Close** the group when a sample breaks the bound. The group becomes
//!    a fixation if it spans at least the duration threshold; otherwise it
//!    is dropped as saccade noise. The breaking sample opens the next group.
//! 4. **Flush** the last open group with the same duration rule.
//!
//! The bounding box is tracked as four running extrema. Adding a point can
//! only grow the box, so this matches recomputing it over the whole group.

use gazekit_session_model::fixation::Fixation;
use gazekit_session_model::sample::{GazeSample, TimestampMs};

/// Thresholds for the dispersion detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Maximum `(max_x - min_x) + (max_y - min_y)` of a group, in pixels.
    pub dispersion_threshold: f64,

    /// Minimum `last - first` timestamp span of a group, in milliseconds.
    pub duration_threshold_ms: TimestampMs,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            dispersion_threshold: 100.0,
            duration_threshold_ms: 200,
        }
    }
}

/// Counters describing one detection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionStats {
    /// Samples received.
    pub samples: usize,
    /// Groups closed, kept or not.
    pub groups: usize,
    /// Groups dropped for being shorter than the duration threshold.
    pub discarded: usize,
    /// Fixations emitted.
    pub fixations: usize,
}

/// Running bounding box of the open group.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Extent {
    fn at(sample: &GazeSample) -> Self {
        Self {
            min_x: sample.x,
            max_x: sample.x,
            min_y: sample.y,
            max_y: sample.y,
        }
    }

    fn extended(&self, sample: &GazeSample) -> Self {
        Self {
            min_x: self.min_x.min(sample.x),
            max_x: self.max_x.max(sample.x),
            min_y: self.min_y.min(sample.y),
            max_y: self.max_y.max(sample.y),
        }
    }

    fn dispersion(&self) -> f64 {
        (self.max_x - self.min_x) + (self.max_y - self.min_y)
    }
}

/// The dispersion-threshold fixation detector.
pub struct FixationDetector {
    config: DetectorConfig,
}

impl FixationDetector {
    /// Create a detector with the given thresholds.
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Create a detector with default thresholds (100 px, 200 ms).
    pub fn with_defaults() -> Self {
        Self::new(DetectorConfig::default())
    }

    /// Detect fixations, ordered by start time.
    pub fn detect(&self, samples: &[GazeSample]) -> Vec<Fixation> {
        self.detect_with_stats(samples).0
    }

    /// Detect fixations and return run counters alongside.
    pub fn detect_with_stats(&self, samples: &[GazeSample]) -> (Vec<Fixation>, DetectionStats) {
        let mut stats = DetectionStats {
            samples: samples.len(),
            ..Default::default()
        };

        if samples.is_empty() {
            return (vec![], stats);
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by_key(|s| s.timestamp_ms);

        let mut fixations = vec![];
        let mut group_start = 0;
        let mut extent = Extent::at(&sorted[0]);

        for (i, sample) in sorted.iter().enumerate().skip(1) {
            let candidate = extent.extended(sample);
            if candidate.dispersion() <= self.config.dispersion_threshold {
                extent = candidate;
                continue;
            }

            self.close_group(&sorted[group_start..i], &mut fixations, &mut stats);
            group_start = i;
            extent = Extent::at(sample);
        }

        self.close_group(&sorted[group_start..], &mut fixations, &mut stats);

        tracing::debug!(
            samples = stats.samples,
            groups = stats.groups,
            discarded = stats.discarded,
            fixations = stats.fixations,
            "Fixation detection finished"
        );

        (fixations, stats)
    }

    fn close_group(
        &self,
        group: &[GazeSample],
        fixations: &mut Vec<Fixation>,
        stats: &mut DetectionStats,
    ) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            return;
        };
        stats.groups += 1;

        let duration = last.timestamp_ms.saturating_sub(first.timestamp_ms);
        if duration < self.config.duration_threshold_ms {
            stats.discarded += 1;
            return;
        }

        let (x, y) = compute_centroid(group);
        fixations.push(Fixation::new(x, y, first.timestamp_ms, last.timestamp_ms));
        stats.fixations += 1;
    }
}

/// Detect fixations with explicit thresholds.
pub fn detect_fixations(
    samples: &[GazeSample],
    dispersion_threshold: f64,
    duration_threshold_ms: TimestampMs,
) -> Vec<Fixation> {
    FixationDetector::new(DetectorConfig {
        dispersion_threshold,
        duration_threshold_ms,
    })
    .detect(samples)
}

/// Arithmetic mean of the sample positions.
fn compute_centroid(group: &[GazeSample]) -> (f64, f64) {
    let n = group.len() as f64;
    let sum_x: f64 = group.iter().map(|s| s.x).sum();
    let sum_y: f64 = group.iter().map(|s| s.y).sum();
    (sum_x / n, sum_y / n)
}
