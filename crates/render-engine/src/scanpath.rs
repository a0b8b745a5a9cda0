//! Scanpath rendering: saccade lines between numbered fixation discs.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use serde::Serialize;

use gazekit_processing_core::scanpath::{Scanpath, ScanpathPoint};
use gazekit_session_model::aoi::Aoi;

use crate::overlay::{draw_aoi_outlines, AoiOutline, SCANPATH_AOI_COLOR};

const BLANK: Rgb<u8> = Rgb([255, 255, 255]);

/// Half-transparent blue on white.
const SACCADE_COLOR: Rgb<u8> = Rgb([128, 128, 255]);

/// Red at 70% opacity on white.
const FIXATION_COLOR: Rgb<u8> = Rgb([255, 77, 77]);

/// Disc area grows with duration: `radius = sqrt(duration / 30)`.
const DURATION_PER_AREA: f64 = 30.0;
const MIN_RADIUS: i32 = 2;

/// Longest canvas edge. Larger plots are scaled down to fit.
pub const MAX_CANVAS_EDGE: u32 = 4096;

/// Non-pixel facts about a rendered scanpath. The sequence numbers live
/// here since the image carries no text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanpathSidecar {
    pub width: u32,
    pub height: u32,
    /// Pixels per screen pixel; below 1 when the plot was shrunk to fit.
    pub scale: f64,
    pub total_length: f64,
    pub points: Vec<ScanpathPoint>,
    pub aois: Vec<AoiOutline>,
}

/// A rendered scanpath and its sidecar.
#[derive(Debug, Clone)]
pub struct ScanpathPlot {
    pub image: RgbImage,
    pub sidecar: ScanpathSidecar,
}

/// Render the scanpath on a canvas sized to 110% of the largest fixation
/// coordinates, shrunk uniformly when an edge would exceed
/// [`MAX_CANVAS_EDGE`]. Returns `None` when there are no fixations to plot.
/// Sidecar coordinates stay in screen pixels.
pub fn render_scanpath(scanpath: &Scanpath, aois: &[Aoi]) -> Option<ScanpathPlot> {
    if scanpath.is_empty() {
        tracing::warn!("No fixations available; scanpath not rendered");
        return None;
    }

    let (bound_x, bound_y) = scanpath.bounds();
    let longest = bound_x.max(bound_y);
    let limit = MAX_CANVAS_EDGE as f64;
    let scale = if longest.is_finite() && longest > limit {
        limit / longest
    } else {
        1.0
    };
    if scale < 1.0 {
        tracing::warn!(
            bound_x,
            bound_y,
            scale,
            "Scanpath exceeds the canvas limit; scaling down"
        );
    }

    let edge = |bound: f64| ((bound * scale).ceil() as u32).clamp(1, MAX_CANVAS_EDGE);
    let (width, height) = (edge(bound_x), edge(bound_y));
    let mut image = RgbImage::from_pixel(width, height, BLANK);

    for (from, to) in scanpath.saccades() {
        draw_line_segment_mut(
            &mut image,
            ((from.x * scale) as f32, (from.y * scale) as f32),
            ((to.x * scale) as f32, (to.y * scale) as f32),
            SACCADE_COLOR,
        );
    }

    for point in &scanpath.points {
        draw_filled_circle_mut(
            &mut image,
            (
                (point.x * scale).round() as i32,
                (point.y * scale).round() as i32,
            ),
            disc_radius(point.duration),
            FIXATION_COLOR,
        );
    }

    draw_aoi_outlines(&mut image, aois, scale, SCANPATH_AOI_COLOR);

    tracing::debug!(width, height, points = scanpath.len(), "Rendered scanpath");

    Some(ScanpathPlot {
        image,
        sidecar: ScanpathSidecar {
            width,
            height,
            scale,
            total_length: scanpath.total_length(),
            points: scanpath.points.clone(),
            aois: aois.iter().map(AoiOutline::from).collect(),
        },
    })
}

fn disc_radius(duration: i64) -> i32 {
    let radius = (duration.max(0) as f64 / DURATION_PER_AREA).sqrt().round() as i32;
    radius.max(MIN_RADIUS)
}
