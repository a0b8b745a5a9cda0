//! Detect fixations and export them as CSV or JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use gazekit_common::config::AppConfig;
use gazekit_session_model::fixation::write_fixations_csv;

use super::{ensure_parent, load_fixations, output_path, FixationFormat, InputArgs};

pub fn run(
    config: &AppConfig,
    input: InputArgs,
    output: Option<PathBuf>,
    format: FixationFormat,
) -> anyhow::Result<()> {
    println!("Detecting fixations in: {}", input.input.display());

    let fixations = load_fixations(config, &input)?;

    let path = output_path(
        config,
        output,
        &format!("fixations.{}", format.extension()),
    );
    ensure_parent(&path)?;
    let writer = BufWriter::new(File::create(&path)?);

    match format {
        FixationFormat::Csv => write_fixations_csv(writer, &fixations)
            .map_err(|e| anyhow::anyhow!("Failed to write fixations: {e}"))?,
        FixationFormat::Json => serde_json::to_writer_pretty(writer, &fixations)
            .map_err(|e| anyhow::anyhow!("Failed to write fixations: {e}"))?,
    }

    tracing::info!(path = %path.display(), count = fixations.len(), "Fixations written");
    println!("  Fixations saved to: {}", path.display());

    Ok(())
}
