//! Compute AOI metrics for one page and save the session report.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use gazekit_common::config::AppConfig;
use gazekit_processing_core::metrics::MetricsCalculator;
use gazekit_session_model::report::SessionReport;

use super::{
    detector_config, ensure_parent, load_fixations, load_registry, output_path, InputArgs,
};

/// Detection thresholds recorded alongside a report.
#[derive(Debug, Serialize)]
struct Thresholds {
    dispersion_threshold: f64,
    duration_threshold_ms: i64,
}

/// The JSON document written by `gazekit analyze`.
#[derive(Debug, Serialize)]
struct ReportEnvelope<'a> {
    generated_at: DateTime<Utc>,
    input: &'a Path,
    page: &'a str,
    /// Absent when fixations were read rather than detected.
    detection: Option<Thresholds>,
    report: &'a SessionReport,
}

pub fn run(
    config: &AppConfig,
    input: InputArgs,
    aois: Option<PathBuf>,
    page: Option<String>,
    start: Option<i64>,
    end: Option<i64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let page = page.unwrap_or_else(|| config.default_page.clone());
    println!("Analyzing {} (page '{page}')", input.input.display());

    let registry = load_registry(aois.as_deref())?;
    if !registry.has_page(&page) {
        // fail before the detection work
        anyhow::bail!("Page '{page}' is not defined in the AOI layout");
    }

    let fixations = load_fixations(config, &input)?;

    let calculator = MetricsCalculator::new(&fixations, &registry);
    let report = calculator
        .summary_report(&page, start, end)
        .map_err(|e| {
            if e.is_lookup() {
                anyhow::anyhow!("AOI lookup failed: {e}")
            } else {
                anyhow::anyhow!("Failed to compute report: {e}")
            }
        })?;

    print_report(&page, &report);

    let detection = (!input.from_fixations).then(|| {
        let detector = detector_config(config, &input);
        Thresholds {
            dispersion_threshold: detector.dispersion_threshold,
            duration_threshold_ms: detector.duration_threshold_ms,
        }
    });

    let envelope = ReportEnvelope {
        generated_at: Utc::now(),
        input: &input.input,
        page: &page,
        detection,
        report: &report,
    };

    let path = output_path(config, output, "report.json");
    ensure_parent(&path)?;
    std::fs::write(&path, serde_json::to_string_pretty(&envelope)?)?;

    tracing::info!(path = %path.display(), "Report written");
    println!("\n  Report saved to: {}", path.display());

    Ok(())
}

fn print_report(page: &str, report: &SessionReport) {
    println!();
    println!("Session:");
    println!("  Fixations: {}", report.n_fixations);
    println!("  Recording duration: {} ms", report.recording_duration_ms);

    let Some(summary) = &report.summary else {
        println!("  No fixations detected.");
        return;
    };

    println!("  Total fixation time: {} ms", summary.total_fixation_time);
    println!(
        "  Mean fixation duration: {:.1} ms",
        summary.mean_fixation_duration
    );
    if report.has_finite_rate() {
        println!("  Fixation rate: {:.2}/s", summary.fixation_rate);
    } else {
        println!("  Fixation rate: inf (zero-length recording)");
    }
    println!();

    println!("AOIs on '{page}':");
    if summary.aois.is_empty() {
        println!("  (none defined)");
    }
    for stats in &summary.aois {
        let ttff = stats
            .ttff
            .map(|t| format!("{t} ms"))
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  {:<12} TTFF {:>9}  dwell {:>6} ms  fixations {:>3}  mean {:.1} ms",
            stats.name, ttff, stats.dwell_time, stats.fixation_count, stats.mean_fixation_duration
        );
    }
}
