//! Fixation events produced by the detector.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};
use crate::sample::TimestampMs;

/// A period during which gaze stayed within the dispersion bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fixation {
    /// Centroid X of the clustered samples.
    pub x: f64,
    /// Centroid Y of the clustered samples.
    pub y: f64,
    /// Timestamp of the first sample in the cluster.
    pub start_time: TimestampMs,
    /// Timestamp of the last sample in the cluster.
    pub end_time: TimestampMs,
    /// `end_time - start_time`, saturating at the `i64` bounds.
    pub duration: TimestampMs,
}

impl Fixation {
    /// Create a fixation; `duration` is derived from the time span.
    pub fn new(x: f64, y: f64, start_time: TimestampMs, end_time: TimestampMs) -> Self {
        Self {
            x,
            y,
            start_time,
            end_time,
            duration: end_time.saturating_sub(start_time),
        }
    }
}

/// Sort fixations by start time without disturbing the order of ties.
pub fn sorted_by_start(fixations: &[Fixation]) -> Vec<Fixation> {
    let mut sorted = fixations.to_vec();
    sorted.sort_by_key(|f| f.start_time);
    sorted
}

/// Write fixations as CSV with columns `x,y,start_time,end_time,duration`.
pub fn write_fixations_csv<W: Write>(writer: W, fixations: &[Fixation]) -> SessionResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for fixation in fixations {
        writer.serialize(fixation)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read fixations previously written by [`write_fixations_csv`].
///
/// `duration` is recomputed from the time span so a hand-edited file cannot
/// carry an inconsistent value.
pub fn read_fixations_csv<R: Read>(reader: R) -> SessionResult<Vec<Fixation>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut fixations = Vec::new();
    for (row, result) in reader.deserialize::<Fixation>().enumerate() {
        let parsed = result.map_err(|e| SessionError::InvalidRecord {
            line: row + 2,
            message: e.to_string(),
        })?;
        fixations.push(Fixation::new(
            parsed.x,
            parsed.y,
            parsed.start_time,
            parsed.end_time,
        ));
    }
    Ok(fixations)
}
