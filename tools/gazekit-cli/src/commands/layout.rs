//! List the pages and AOIs of a layout file.

use std::path::PathBuf;

use gazekit_session_model::aoi::AoiRegistry;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let registry =
        AoiRegistry::load(&path).map_err(|e| anyhow::anyhow!("Failed to load layout: {e}"))?;

    println!("Layout: {}", path.display());
    println!("  Pages: {}", registry.pages().count());
    println!("  AOIs: {}", registry.len());
    println!();

    for page in registry.pages() {
        let aois = registry
            .get_all_aois(page)
            .map_err(|e| anyhow::anyhow!("Failed to read page '{page}': {e}"))?;
        println!("{page}:");
        if aois.is_empty() {
            println!("  (no AOIs)");
        }
        for (index, aoi) in aois.iter().enumerate() {
            println!(
                "  [{index}] {:<12} x {:>7.1}..{:<7.1} y {:>7.1}..{:<7.1}",
                aoi.name, aoi.x_min, aoi.x_max, aoi.y_min, aoi.y_max
            );
        }
    }

    Ok(())
}
