//! AOI rectangle outlines shared by both plot kinds.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::Serialize;

use gazekit_session_model::aoi::Aoi;

/// Outline colour on heatmaps.
pub const HEATMAP_AOI_COLOR: Rgb<u8> = Rgb([30, 60, 220]);

/// Outline colour on scanpaths.
pub const SCANPATH_AOI_COLOR: Rgb<u8> = Rgb([20, 160, 40]);

/// Outline stroke in pixels.
const STROKE: i32 = 2;

/// AOI rectangle as written to plot sidecars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AoiOutline {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<&Aoi> for AoiOutline {
    fn from(aoi: &Aoi) -> Self {
        Self {
            name: aoi.name.clone(),
            x: aoi.x_min,
            y: aoi.y_min,
            width: aoi.width,
            height: aoi.height,
        }
    }
}

/// Draw every AOI as a hollow rectangle, with coordinates multiplied by
/// `scale`. Zero-size AOIs are drawn one pixel wide so they stay visible.
pub fn draw_aoi_outlines(image: &mut RgbImage, aois: &[Aoi], scale: f64, color: Rgb<u8>) {
    for aoi in aois {
        let x = (aoi.x_min * scale).round() as i32;
        let y = (aoi.y_min * scale).round() as i32;
        let w = (aoi.width * scale).round().max(1.0) as u32;
        let h = (aoi.height * scale).round().max(1.0) as u32;

        for inset in 0..STROKE {
            let shrink = 2 * inset as u32;
            let (iw, ih) = (w.saturating_sub(shrink), h.saturating_sub(shrink));
            if iw == 0 || ih == 0 {
                break;
            }
            draw_hollow_rect_mut(image, Rect::at(x + inset, y + inset).of_size(iw, ih), color);
        }
    }
}
