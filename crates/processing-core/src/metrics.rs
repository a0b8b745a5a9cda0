//! AOI metrics over a fixation sequence.
//!
//! [`MetricsCalculator`] borrows the fixations and the AOI registry and
//! answers read-only queries: time to first fixation, dwell time, per-AOI
//! statistics and the session summary. Nothing is cached between calls
//! except the chronological order of the fixations.

use gazekit_session_model::aoi::{Aoi, AoiRef, AoiRegistry};
use gazekit_session_model::error::SessionResult;
use gazekit_session_model::fixation::Fixation;
use gazekit_session_model::report::{AoiStatistics, SessionReport, SessionSummary};
use gazekit_session_model::sample::TimestampMs;

/// Read-only metrics over one session's fixations.
pub struct MetricsCalculator<'a> {
    fixations: &'a [Fixation],
    registry: &'a AoiRegistry,
    /// Fixations stably sorted by start time.
    chronological: Vec<&'a Fixation>,
}

impl<'a> MetricsCalculator<'a> {
    pub fn new(fixations: &'a [Fixation], registry: &'a AoiRegistry) -> Self {
        let mut chronological: Vec<&Fixation> = fixations.iter().collect();
        chronological.sort_by_key(|f| f.start_time);
        Self {
            fixations,
            registry,
            chronological,
        }
    }

    /// Earliest fixation start, the default time baseline.
    pub fn first_start(&self) -> Option<TimestampMs> {
        self.chronological.first().map(|f| f.start_time)
    }

    /// Latest fixation end.
    pub fn last_end(&self) -> Option<TimestampMs> {
        self.fixations.iter().map(|f| f.end_time).max()
    }

    /// Time from `start_time` (default: first fixation start) to the first
    /// fixation inside the AOI.
    ///
    /// Returns `Ok(None)` when no fixation lands in the AOI. With the default
    /// baseline the result is never negative.
    pub fn calculate_ttff(
        &self,
        aoi: &AoiRef,
        start_time: Option<TimestampMs>,
    ) -> SessionResult<Option<TimestampMs>> {
        let area = self.registry.get_aoi(aoi)?;
        let Some(first_start) = self.first_start() else {
            return Ok(None);
        };
        let baseline = start_time.unwrap_or(first_start);

        Ok(self
            .chronological
            .iter()
            .find(|f| area.contains(f.x, f.y))
            .map(|f| f.start_time.saturating_sub(baseline)))
    }

    /// Total duration and count of fixations inside the AOI.
    pub fn calculate_dwell_time(&self, aoi: &AoiRef) -> SessionResult<(TimestampMs, usize)> {
        let area = self.registry.get_aoi(aoi)?;
        Ok(Self::dwell_in(self.fixations, area))
    }

    fn dwell_in(fixations: &[Fixation], area: &Aoi) -> (TimestampMs, usize) {
        fixations
            .iter()
            .filter(|f| area.contains(f.x, f.y))
            .fold((0, 0), |(total, count): (TimestampMs, usize), f| {
                (total.saturating_add(f.duration), count + 1)
            })
    }

    /// Fixations inside the AOI, in chronological order.
    pub fn fixations_in_aoi(&self, aoi: &AoiRef) -> SessionResult<Vec<&'a Fixation>> {
        let area = self.registry.get_aoi(aoi)?;
        Ok(self
            .chronological
            .iter()
            .copied()
            .filter(|f| area.contains(f.x, f.y))
            .collect())
    }

    /// TTFF, dwell time, count and mean duration for one AOI.
    pub fn aoi_statistics(
        &self,
        aoi: &AoiRef,
        start_time: Option<TimestampMs>,
    ) -> SessionResult<AoiStatistics> {
        let area = self.registry.get_aoi(aoi)?;
        let ttff = self.calculate_ttff(aoi, start_time)?;
        let (dwell_time, fixation_count) = Self::dwell_in(self.fixations, area);

        let mean_fixation_duration = if fixation_count > 0 {
            dwell_time as f64 / fixation_count as f64
        } else {
            0.0
        };

        Ok(AoiStatistics {
            name: area.name.clone(),
            ttff,
            dwell_time,
            fixation_count,
            mean_fixation_duration,
        })
    }

    /// Statistics for every AOI of `page`, in definition order.
    pub fn page_statistics(
        &self,
        page: &str,
        start_time: Option<TimestampMs>,
    ) -> SessionResult<Vec<AoiStatistics>> {
        self.registry
            .aoi_refs(page)?
            .iter()
            .map(|aoi| self.aoi_statistics(aoi, start_time))
            .collect()
    }

    /// Session summary against the AOIs of `page`.
    ///
    /// `start_time` and `end_time` default to the first fixation start and
    /// the last fixation end. A zero-length span yields an infinite
    /// fixation rate instead of failing.
    pub fn summary_report(
        &self,
        page: &str,
        start_time: Option<TimestampMs>,
        end_time: Option<TimestampMs>,
    ) -> SessionResult<SessionReport> {
        // unknown pages fail even when there is nothing to aggregate
        self.registry.get_all_aois(page)?;

        let (Some(first_start), Some(last_end)) = (self.first_start(), self.last_end()) else {
            return Ok(SessionReport::empty());
        };

        let start = start_time.unwrap_or(first_start);
        let end = end_time.unwrap_or(last_end);
        let recording_duration_ms = end.saturating_sub(start);

        let n_fixations = self.fixations.len();
        let total_fixation_time = self
            .fixations
            .iter()
            .fold(0 as TimestampMs, |total, f| total.saturating_add(f.duration));
        let mean_fixation_duration = total_fixation_time as f64 / n_fixations as f64;
        let fixation_rate = n_fixations as f64 / (recording_duration_ms as f64 / 1000.0);

        if recording_duration_ms == 0 {
            tracing::warn!(
                n_fixations,
                "Recording span is zero; fixation rate is infinite"
            );
        }

        let aois = self.page_statistics(page, Some(start))?;

        Ok(SessionReport {
            n_fixations,
            recording_duration_ms,
            summary: Some(SessionSummary {
                mean_fixation_duration,
                total_fixation_time,
                fixation_rate,
                aois,
            }),
        })
    }
}
