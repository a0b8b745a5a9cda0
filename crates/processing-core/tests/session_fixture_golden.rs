use std::path::PathBuf;

use gazekit_processing_core::fixation::{DetectorConfig, FixationDetector};
use gazekit_processing_core::metrics::MetricsCalculator;
use gazekit_processing_core::scanpath::Scanpath;
use gazekit_session_model::aoi::AoiRegistry;
use gazekit_session_model::fixation::Fixation;
use gazekit_session_model::sample::{load_samples, GazeSample};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-session")
}

fn load_fixture_samples(page: Option<&str>) -> Vec<GazeSample> {
    load_samples(&fixture_dir().join("gaze.csv"), page).expect("fixture samples should load")
}

fn load_fixture_registry() -> AoiRegistry {
    AoiRegistry::load(&fixture_dir().join("aois.json")).expect("fixture layout should load")
}

fn detect_fixture(page: Option<&str>) -> Vec<Fixation> {
    FixationDetector::new(DetectorConfig {
        dispersion_threshold: 100.0,
        duration_threshold_ms: 200,
    })
    .detect(&load_fixture_samples(page))
}

#[test]
fn fixture_fixations_are_stable() {
    let fixations = detect_fixture(None);

    let expected = [
        (152.071429, 100.871429, 1000, 1260),
        (519.395, 307.555, 1310, 1690),
        (88.9, 380.775, 1830, 2050),
        (610.84375, 416.39375, 2100, 2400),
        (961.266667, 702.146667, 2450, 2730),
    ];

    assert_eq!(fixations.len(), expected.len());
    for (fixation, (x, y, start, end)) in fixations.iter().zip(expected) {
        assert!((fixation.x - x).abs() < 1e-5, "x {} != {}", fixation.x, x);
        assert!((fixation.y - y).abs() < 1e-5, "y {} != {}", fixation.y, y);
        assert_eq!(fixation.start_time, start);
        assert_eq!(fixation.end_time, end);
    }
}

#[test]
fn page_filter_drops_short_cart_visit() {
    let all = load_fixture_samples(None);
    let home = load_fixture_samples(Some("home"));
    assert_eq!(all.len(), 90);
    assert_eq!(home.len(), 80);

    // the cart glance is shorter than the duration threshold either way
    assert_eq!(detect_fixture(Some("home")), detect_fixture(None));
}

#[test]
fn fixture_summary_report() {
    let fixations = detect_fixture(None);
    let registry = load_fixture_registry();
    let report = MetricsCalculator::new(&fixations, &registry)
        .summary_report("home", None, None)
        .unwrap();

    assert_eq!(report.n_fixations, 5);
    assert_eq!(report.recording_duration_ms, 1730);
    let summary = report.summary.as_ref().unwrap();
    assert_eq!(summary.total_fixation_time, 1440);
    assert!((summary.mean_fixation_duration - 288.0).abs() < 1e-9);
    assert!((summary.fixation_rate - 5.0 / 1.73).abs() < 1e-9);

    let rows: Vec<(&str, Option<i64>, i64, usize)> = summary
        .aois
        .iter()
        .map(|a| (a.name.as_str(), a.ttff, a.dwell_time, a.fixation_count))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("logo", Some(0), 260, 1),
            ("menu", Some(830), 220, 1),
            ("content", Some(310), 680, 2),
        ]
    );
}

#[test]
fn fixture_scanpath_follows_fixations() {
    let fixations = detect_fixture(None);
    let scanpath = Scanpath::from_fixations(&fixations);
    assert_eq!(scanpath.len(), 5);
    assert_eq!(scanpath.saccades().count(), 4);
    assert!(scanpath
        .points
        .windows(2)
        .all(|w| w[0].start_time < w[1].start_time));
}
