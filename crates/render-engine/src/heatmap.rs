//! Heatmap rendering.
//!
//! The density grid from the processing core is normalised to its peak and
//! mapped through a transparent → red → yellow ramp, then alpha-blended
//! over a background (a screenshot of the page, or white).

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use serde::Serialize;

use gazekit_processing_core::heatmap::{HeatmapConfig, HeatmapGrid};
use gazekit_session_model::aoi::Aoi;
use gazekit_session_model::fixation::Fixation;

use crate::overlay::{draw_aoi_outlines, AoiOutline, HEATMAP_AOI_COLOR};

const BLANK: Rgb<u8> = Rgb([255, 255, 255]);

/// Ramp stops as `(position, [r, g, b], alpha)`.
const RAMP: [(f64, [f64; 3], f64); 3] = [
    (0.0, [0.0, 0.0, 0.0], 0.0),
    (0.5, [1.0, 0.0, 0.0], 0.7),
    (1.0, [1.0, 1.0, 0.0], 0.9),
];

/// Grid settings plus an optional background image.
#[derive(Debug, Clone, Default)]
pub struct HeatmapStyle {
    pub grid: HeatmapConfig,

    /// Page screenshot, resized to the canvas. Skipped with a warning when
    /// it cannot be read.
    pub background: Option<PathBuf>,
}

/// Non-pixel facts about a rendered heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapSidecar {
    pub width: usize,
    pub height: usize,
    pub sigma: f64,
    pub fixations: usize,
    pub max_density: f64,
    /// Hottest pixel as `[x, y]`.
    pub hotspot: Option<[usize; 2]>,
    pub aois: Vec<AoiOutline>,
}

/// A rendered heatmap and its sidecar.
#[derive(Debug, Clone)]
pub struct HeatmapPlot {
    pub image: RgbImage,
    pub sidecar: HeatmapSidecar,
}

/// Render fixations as a heatmap with AOI outlines on top.
pub fn render_heatmap(fixations: &[Fixation], aois: &[Aoi], style: &HeatmapStyle) -> HeatmapPlot {
    let grid = HeatmapGrid::from_fixations(fixations, style.grid);
    let (width, height) = (grid.width as u32, grid.height as u32);

    let mut image = style
        .background
        .as_deref()
        .and_then(|path| load_background(path, width, height))
        .unwrap_or_else(|| RgbImage::from_pixel(width, height, BLANK));

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let value = grid
            .normalized_cell(x as usize, y as usize)
            .unwrap_or(0.0);
        if value <= 0.0 {
            continue;
        }
        let (color, alpha) = ramp(value);
        *pixel = blend(*pixel, color, alpha);
    }

    draw_aoi_outlines(&mut image, aois, 1.0, HEATMAP_AOI_COLOR);

    let sidecar = HeatmapSidecar {
        width: grid.width,
        height: grid.height,
        sigma: style.grid.sigma,
        fixations: fixations.len(),
        max_density: grid.max_density,
        hotspot: grid.hotspot().map(|(x, y)| [x, y]),
        aois: aois.iter().map(AoiOutline::from).collect(),
    };

    tracing::debug!(
        width,
        height,
        max_density = grid.max_density,
        "Rendered heatmap"
    );

    HeatmapPlot { image, sidecar }
}

fn load_background(path: &Path, width: u32, height: u32) -> Option<RgbImage> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Background image not found; using blank canvas");
        return None;
    }

    match image::open(path) {
        Ok(img) => Some(image::imageops::resize(
            &img.to_rgb8(),
            width,
            height,
            FilterType::Triangle,
        )),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "Failed to decode background image; using blank canvas"
            );
            None
        }
    }
}

/// Colour and opacity for a normalised density in `[0, 1]`.
fn ramp(value: f64) -> ([f64; 3], f64) {
    let value = value.clamp(0.0, 1.0);
    for pair in RAMP.windows(2) {
        let (lo, lo_rgb, lo_a) = pair[0];
        let (hi, hi_rgb, hi_a) = pair[1];
        if value <= hi {
            let t = (value - lo) / (hi - lo);
            let rgb = [
                lo_rgb[0] + (hi_rgb[0] - lo_rgb[0]) * t,
                lo_rgb[1] + (hi_rgb[1] - lo_rgb[1]) * t,
                lo_rgb[2] + (hi_rgb[2] - lo_rgb[2]) * t,
            ];
            return (rgb, lo_a + (hi_a - lo_a) * t);
        }
    }
    let (_, rgb, alpha) = RAMP[RAMP.len() - 1];
    (rgb, alpha)
}

fn blend(base: Rgb<u8>, color: [f64; 3], alpha: f64) -> Rgb<u8> {
    let mix = |b: u8, c: f64| (b as f64 * (1.0 - alpha) + c * 255.0 * alpha).round() as u8;
    Rgb([
        mix(base[0], color[0]),
        mix(base[1], color[1]),
        mix(base[2], color[2]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_style() -> HeatmapStyle {
        HeatmapStyle {
            grid: HeatmapConfig {
                width: 60,
                height: 40,
                sigma: 4.0,
            },
            background: None,
        }
    }

    #[test]
    fn ramp_hits_its_stops() {
        assert_eq!(ramp(0.0), ([0.0, 0.0, 0.0], 0.0));
        let (rgb, alpha) = ramp(0.5);
        assert_eq!(rgb, [1.0, 0.0, 0.0]);
        assert!((alpha - 0.7).abs() < 1e-12);
        let (rgb, alpha) = ramp(1.0);
        assert_eq!(rgb, [1.0, 1.0, 0.0]);
        assert!((alpha - 0.9).abs() < 1e-12);
    }

    #[test]
    fn hotspot_is_yellow_and_cold_pixels_keep_background() {
        let fixations = vec![Fixation::new(30.0, 20.0, 0, 400)];
        let plot = render_heatmap(&fixations, &[], &small_style());

        let hot = plot.image.get_pixel(30, 20);
        assert_eq!(hot[0], 255);
        assert!(hot[1] > 200);
        assert!(hot[2] < 40);
        assert_eq!(*plot.image.get_pixel(0, 0), BLANK);
        assert_eq!(plot.sidecar.hotspot, Some([30, 20]));
        assert_eq!(plot.sidecar.fixations, 1);
    }

    #[test]
    fn empty_session_renders_blank_canvas() {
        let plot = render_heatmap(&[], &[], &small_style());
        assert_eq!(plot.image.dimensions(), (60, 40));
        assert!(plot.image.pixels().all(|p| *p == BLANK));
        assert_eq!(plot.sidecar.hotspot, None);
        assert_eq!(plot.sidecar.max_density, 0.0);
    }

    #[test]
    fn aoi_outlines_are_drawn_and_listed() {
        let aoi = Aoi::new("logo", 5.0, 5.0, 20.0, 10.0).unwrap();
        let plot = render_heatmap(&[], &[aoi], &small_style());
        assert_eq!(*plot.image.get_pixel(5, 5), HEATMAP_AOI_COLOR);
        assert_eq!(plot.sidecar.aois.len(), 1);
        assert_eq!(plot.sidecar.aois[0].name, "logo");
    }

    #[test]
    fn missing_background_falls_back_to_blank() {
        let style = HeatmapStyle {
            background: Some(PathBuf::from("/definitely/not/here.png")),
            ..small_style()
        };
        let plot = render_heatmap(&[], &[], &style);
        assert_eq!(*plot.image.get_pixel(10, 10), BLANK);
    }

    #[test]
    fn background_is_resized_to_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        RgbImage::from_pixel(10, 10, Rgb([0, 0, 255]))
            .save(&path)
            .unwrap();

        let style = HeatmapStyle {
            background: Some(path),
            ..small_style()
        };
        let plot = render_heatmap(&[], &[], &style);

        assert_eq!(plot.image.dimensions(), (60, 40));
        let pixel = plot.image.get_pixel(30, 20);
        assert!(pixel[2] > 250);
        assert!(pixel[0] < 5);
    }
}
