//! Write the built-in storefront AOI layout and, optionally, a default config.

use std::path::PathBuf;

use gazekit_common::config::{config_file_path, AppConfig};
use gazekit_session_model::aoi::AoiRegistry;

pub fn run(output: PathBuf, force: bool, with_config: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let registry = AoiRegistry::storefront_default();
    registry
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write layout: {e}"))?;

    println!("AOI layout written to {}", output.display());
    for page in registry.pages() {
        let names: Vec<&str> = registry
            .get_all_aois(page)
            .map(|aois| aois.iter().map(|a| a.name.as_str()).collect())
            .unwrap_or_default();
        println!("  {page}: {}", names.join(", "));
    }

    if with_config {
        let path = config_file_path();
        if path.exists() && !force {
            println!("Config already present at {}; left unchanged", path.display());
        } else {
            AppConfig::default()
                .save()
                .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
            println!("Default config written to {}", path.display());
        }
    }

    println!();
    println!(
        "Edit the rectangles to match your page, then pass --aois {}",
        output.display()
    );

    Ok(())
}
