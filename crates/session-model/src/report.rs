//! Derived statistics records.
//!
//! These are recomputed on every call and never persisted; they serialize
//! as plain keyed records for reporting and plotting layers.

use serde::{Deserialize, Serialize};

use crate::sample::TimestampMs;

/// Metrics for a single AOI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AoiStatistics {
    pub name: String,
    /// Time to first fixation relative to the baseline; `None` when no
    /// fixation ever landed in the AOI.
    pub ttff: Option<TimestampMs>,
    /// Summed duration of fixations inside the AOI.
    pub dwell_time: TimestampMs,
    pub fixation_count: usize,
    /// `dwell_time / fixation_count`, or `0.0` with no fixations.
    pub mean_fixation_duration: f64,
}

/// Session-wide summary.
///
/// With no fixations only `n_fixations` and `recording_duration_ms` are
/// present (both zero); check [`SessionReport::summary`] before reading
/// rate fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub n_fixations: usize,
    pub recording_duration_ms: TimestampMs,
    #[serde(flatten)]
    pub summary: Option<SessionSummary>,
}

/// Fields present only when at least one fixation exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub mean_fixation_duration: f64,
    pub total_fixation_time: TimestampMs,
    /// Fixations per second. Infinite when the recording span is zero;
    /// serializes as `null` in that case.
    pub fixation_rate: f64,
    /// One entry per AOI of the selected page, in definition order.
    pub aois: Vec<AoiStatistics>,
}

impl SessionReport {
    /// Report for a session without fixations.
    pub fn empty() -> Self {
        Self {
            n_fixations: 0,
            recording_duration_ms: 0,
            summary: None,
        }
    }

    /// Per-AOI statistics; empty when there were no fixations.
    pub fn aois(&self) -> &[AoiStatistics] {
        self.summary
            .as_ref()
            .map(|s| s.aois.as_slice())
            .unwrap_or(&[])
    }

    /// False for empty sessions and for zero-length recordings.
    pub fn has_finite_rate(&self) -> bool {
        self.summary
            .as_ref()
            .map(|s| s.fixation_rate.is_finite())
            .unwrap_or(false)
    }
}
