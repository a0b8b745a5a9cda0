//! Scanpath: fixations in viewing order with saccades between them.

use serde::Serialize;

use gazekit_session_model::fixation::{sorted_by_start, Fixation};
use gazekit_session_model::sample::TimestampMs;

/// Margin applied to the largest coordinates when framing a plot.
const PLOT_MARGIN: f64 = 1.1;

/// One fixation with its 1-based position in viewing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanpathPoint {
    pub sequence: usize,
    pub x: f64,
    pub y: f64,
    pub start_time: TimestampMs,
    pub duration: TimestampMs,
}

/// Fixations ordered by start time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scanpath {
    pub points: Vec<ScanpathPoint>,
}

impl Scanpath {
    pub fn from_fixations(fixations: &[Fixation]) -> Self {
        let points = sorted_by_start(fixations)
            .into_iter()
            .enumerate()
            .map(|(i, f)| ScanpathPoint {
                sequence: i + 1,
                x: f.x,
                y: f.y,
                start_time: f.start_time,
                duration: f.duration,
            })
            .collect();
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Consecutive point pairs (the saccades).
    pub fn saccades(&self) -> impl Iterator<Item = (&ScanpathPoint, &ScanpathPoint)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Summed Euclidean length of all saccades, in pixels.
    pub fn total_length(&self) -> f64 {
        self.saccades()
            .map(|(a, b)| ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt())
            .sum()
    }

    /// Plot extent: 110% of the largest x and y. `(0, 0)` when empty.
    pub fn bounds(&self) -> (f64, f64) {
        let max_x = self.points.iter().map(|p| p.x).fold(0.0_f64, f64::max);
        let max_y = self.points.iter().map(|p| p.y).fold(0.0_f64, f64::max);
        (max_x * PLOT_MARGIN, max_y * PLOT_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_numbered_in_start_order() {
        let fixations = vec![
            Fixation::new(30.0, 40.0, 500, 700),
            Fixation::new(0.0, 0.0, 0, 200),
        ];
        let scanpath = Scanpath::from_fixations(&fixations);

        assert_eq!(scanpath.len(), 2);
        assert_eq!(scanpath.points[0].sequence, 1);
        assert_eq!(scanpath.points[0].start_time, 0);
        assert_eq!(scanpath.points[1].sequence, 2);
        assert_eq!(scanpath.points[1].x, 30.0);
    }

    #[test]
    fn saccade_length_and_bounds() {
        let fixations = vec![
            Fixation::new(0.0, 0.0, 0, 200),
            Fixation::new(30.0, 40.0, 300, 500),
            Fixation::new(30.0, 100.0, 600, 900),
        ];
        let scanpath = Scanpath::from_fixations(&fixations);

        assert_eq!(scanpath.saccades().count(), 2);
        assert!((scanpath.total_length() - 110.0).abs() < 1e-9);
        let (w, h) = scanpath.bounds();
        assert!((w - 33.0).abs() < 1e-9);
        assert!((h - 110.0).abs() < 1e-9);
    }

    #[test]
    fn empty_scanpath() {
        let scanpath = Scanpath::from_fixations(&[]);
        assert!(scanpath.is_empty());
        assert_eq!(scanpath.saccades().count(), 0);
        assert_eq!(scanpath.total_length(), 0.0);
        assert_eq!(scanpath.bounds(), (0.0, 0.0));
    }

    #[test]
    fn serializes_sequence_labels() {
        let scanpath = Scanpath::from_fixations(&[Fixation::new(1.0, 2.0, 10, 260)]);
        let json = serde_json::to_value(&scanpath).unwrap();
        assert_eq!(json["points"][0]["sequence"], 1);
        assert_eq!(json["points"][0]["duration"], 250);
    }
}
