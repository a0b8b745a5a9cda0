//! Raw gaze samples and their CSV loader.
//!
//! Gaze exports are tabular with one row per sample. The header must carry
//! `x`, `y` and `timestamp`; any other column is ignored, except `page`
//! which can be used to keep only the rows recorded on one page.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Milliseconds on the tracker's clock, monotonic within a session.
pub type TimestampMs = i64;

/// Columns every sample table must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["x", "y", "timestamp"];

/// Optional column naming the page a sample was recorded on.
pub const PAGE_COLUMN: &str = "page";

/// A single gaze point reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    /// Horizontal screen coordinate (pixels).
    pub x: f64,
    /// Vertical screen coordinate (pixels).
    pub y: f64,
    /// Tracker timestamp in milliseconds.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: TimestampMs,
}

impl GazeSample {
    pub fn new(x: f64, y: f64, timestamp_ms: TimestampMs) -> Self {
        Self { x, y, timestamp_ms }
    }
}

/// Column positions resolved once from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    x: usize,
    y: usize,
    timestamp: usize,
    page: Option<usize>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> SessionResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| SessionError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            x: require(REQUIRED_COLUMNS[0])?,
            y: require(REQUIRED_COLUMNS[1])?,
            timestamp: require(REQUIRED_COLUMNS[2])?,
            page: find(PAGE_COLUMN),
        })
    }
}

/// Load samples from a CSV file.
///
/// When `page` is given, only rows whose `page` column equals it are kept;
/// the file must then have a `page` column.
pub fn load_samples(path: &Path, page: Option<&str>) -> SessionResult<Vec<GazeSample>> {
    let file = File::open(path)?;
    let samples = read_samples(file, page)?;
    tracing::info!(
        path = %path.display(),
        count = samples.len(),
        "Loaded gaze samples"
    );
    Ok(samples)
}

/// Read samples from any CSV source.
///
/// Required columns are checked against the header before any row is
/// parsed, so a missing column fails the whole read without partial output.
/// Rows keep their file order; sorting is the detector's job.
pub fn read_samples<R: Read>(reader: R, page: Option<&str>) -> SessionResult<Vec<GazeSample>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let layout = ColumnLayout::from_headers(reader.headers()?)?;
    let page_column = match (page, layout.page) {
        (Some(_), None) => {
            return Err(SessionError::MissingColumn {
                column: PAGE_COLUMN.to_string(),
            })
        }
        (Some(wanted), Some(idx)) => Some((wanted, idx)),
        (None, _) => None,
    };

    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in reader.records().enumerate() {
        // +1 for the header, +1 for 1-based line numbers
        let line = row + 2;
        let record = result.map_err(|e| SessionError::InvalidRecord {
            line,
            message: e.to_string(),
        })?;

        if let Some((wanted, idx)) = page_column {
            if record.get(idx) != Some(wanted) {
                skipped += 1;
                continue;
            }
        }

        let x = parse_coordinate(&record, layout.x, "x", line)?;
        let y = parse_coordinate(&record, layout.y, "y", line)?;
        let timestamp_ms = parse_timestamp(&record, layout.timestamp, line)?;

        samples.push(GazeSample::new(x, y, timestamp_ms));
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Dropped samples recorded on other pages");
    }

    Ok(samples)
}

fn cell<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> SessionResult<&'r str> {
    record
        .get(idx)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SessionError::InvalidRecord {
            line,
            message: format!("empty '{name}' value"),
        })
}

fn parse_coordinate(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> SessionResult<f64> {
    let raw = cell(record, idx, name, line)?;
    let value: f64 = raw.parse().map_err(|e| SessionError::InvalidRecord {
        line,
        message: format!("invalid {name} '{raw}': {e}"),
    })?;

    if !value.is_finite() {
        return Err(SessionError::InvalidRecord {
            line,
            message: format!("{name} must be finite, got '{raw}'"),
        });
    }
    Ok(value)
}

/// Timestamps are integer milliseconds; whole-valued floats such as
/// `1500.0` are accepted since spreadsheet tools like to write them.
fn parse_timestamp(
    record: &csv::StringRecord,
    idx: usize,
    line: usize,
) -> SessionResult<TimestampMs> {
    let raw = cell(record, idx, "timestamp", line)?;
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }

    match raw.parse::<f64>() {
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        Ok(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(SessionError::InvalidRecord {
            line,
            message: format!("invalid timestamp '{raw}': expected integer milliseconds"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_required_columns_in_any_order() {
        let csv = "timestamp,y,x\n0,2.5,1.5\n16,3.0,2.0\n";
        let samples = read_samples(csv.as_bytes(), None).unwrap();
        assert_eq!(
            samples,
            vec![GazeSample::new(1.5, 2.5, 0), GazeSample::new(2.0, 3.0, 16)]
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "x,y,timestamp,page,confidence\n10,20,100,/shop/cart,0.9\n";
        let samples = read_samples(csv.as_bytes(), None).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].timestamp_ms, 100);
    }

    #[test]
    fn missing_column_fails_before_rows_are_read() {
        // second row is malformed, but the header check must fire first
        let csv = "x,timestamp\n1,0\nnot-a-number,16\n";
        let err = read_samples(csv.as_bytes(), None).unwrap_err();
        match err {
            SessionError::MissingColumn { column } => assert_eq!(column, "y"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unsorted_rows_keep_file_order() {
        let csv = "x,y,timestamp\n0,0,50\n1,1,0\n";
        let samples = read_samples(csv.as_bytes(), None).unwrap();
        assert_eq!(samples[0].timestamp_ms, 50);
        assert_eq!(samples[1].timestamp_ms, 0);
    }

    #[test]
    fn invalid_cell_reports_line_number() {
        let csv = "x,y,timestamp\n1,1,0\n2,abc,16\n";
        let err = read_samples(csv.as_bytes(), None).unwrap_err();
        match err {
            SessionError::InvalidRecord { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("invalid y"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn whole_float_timestamps_are_accepted() {
        let csv = "x,y,timestamp\n1,1,1500.0\n";
        let samples = read_samples(csv.as_bytes(), None).unwrap();
        assert_eq!(samples[0].timestamp_ms, 1500);

        let fractional = "x,y,timestamp\n1,1,1500.5\n";
        assert!(read_samples(fractional.as_bytes(), None).is_err());
    }

    #[test]
    fn page_filter_keeps_matching_rows() {
        let csv = "x,y,timestamp,page\n1,1,0,home\n2,2,16,cart\n3,3,32,home\n";
        let samples = read_samples(csv.as_bytes(), Some("home")).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.x != 2.0));
    }

    #[test]
    fn page_filter_requires_page_column() {
        let csv = "x,y,timestamp\n1,1,0\n";
        let err = read_samples(csv.as_bytes(), Some("home")).unwrap_err();
        assert!(matches!(err, SessionError::MissingColumn { column } if column == "page"));
    }

    #[test]
    fn header_only_file_yields_no_samples() {
        let samples = read_samples("x,y,timestamp\n".as_bytes(), None).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn load_samples_from_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x,y,timestamp").unwrap();
        writeln!(file, "512.0,384.0,1000").unwrap();
        file.flush().unwrap();

        let samples = load_samples(file.path(), None).unwrap();
        assert_eq!(samples, vec![GazeSample::new(512.0, 384.0, 1000)]);
    }

    #[test]
    fn timestamps_outside_i64_range_are_rejected() {
        let csv = "x,y,timestamp\n1,1,1e30\n2,2,9.9e29\n";
        let err = read_samples(csv.as_bytes(), None).unwrap_err();
        assert!(matches!(err, SessionError::InvalidRecord { line: 2, .. }));

        let csv = "x,y,timestamp\n1,1,-1e19\n";
        assert!(read_samples(csv.as_bytes(), None).is_err());

        let csv = "x,y,timestamp\n1,1,9.2e18\n";
        let samples = read_samples(csv.as_bytes(), None).unwrap();
        assert_eq!(samples[0].timestamp_ms, 9_200_000_000_000_000_000);
    }
}
