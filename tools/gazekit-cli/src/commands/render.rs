//! Render a heatmap or scanpath PNG with a JSON sidecar.

use std::path::PathBuf;

use gazekit_common::config::AppConfig;
use gazekit_processing_core::heatmap::HeatmapConfig;
use gazekit_processing_core::scanpath::Scanpath;
use gazekit_render_engine::{render_heatmap, render_scanpath, write_plot, HeatmapStyle};

use super::{load_fixations, load_registry, output_path, InputArgs, PlotKind};

/// Canvas settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CanvasOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub sigma: Option<f64>,
    pub background: Option<PathBuf>,
}

pub fn run(
    config: &AppConfig,
    kind: PlotKind,
    input: InputArgs,
    aois: Option<PathBuf>,
    page: Option<String>,
    canvas: CanvasOverrides,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let page = page.unwrap_or_else(|| config.default_page.clone());
    println!(
        "Rendering {} for {} (page '{page}')",
        kind.name(),
        input.input.display()
    );

    let registry = load_registry(aois.as_deref())?;
    let areas = registry
        .get_all_aois(&page)
        .map_err(|e| anyhow::anyhow!("Failed to resolve AOIs: {e}"))?;

    let fixations = load_fixations(config, &input)?;
    let path = output_path(config, output, &format!("{}.png", kind.name()));

    let written = match kind {
        PlotKind::Heatmap => {
            let style = HeatmapStyle {
                grid: HeatmapConfig {
                    width: canvas.width.unwrap_or(config.render.width) as usize,
                    height: canvas.height.unwrap_or(config.render.height) as usize,
                    sigma: canvas.sigma.unwrap_or(config.render.sigma),
                },
                background: canvas.background.or_else(|| config.render.background.clone()),
            };
            let plot = render_heatmap(&fixations, areas, &style);
            write_plot(&plot.image, &plot.sidecar, &path)
                .map_err(|e| anyhow::anyhow!("Failed to save heatmap: {e}"))?
        }
        PlotKind::Scanpath => {
            let scanpath = Scanpath::from_fixations(&fixations);
            let Some(plot) = render_scanpath(&scanpath, areas) else {
                println!("  No fixations to plot; nothing written.");
                return Ok(());
            };
            write_plot(&plot.image, &plot.sidecar, &path)
                .map_err(|e| anyhow::anyhow!("Failed to save scanpath: {e}"))?
        }
    };

    println!("  Image saved to: {}", written.image_path.display());
    println!("  Sidecar saved to: {}", written.sidecar_path.display());

    Ok(())
}
