//! Fixation heatmap density grid.
//!
//! Each fixation deposits a Gaussian blob centred on its pixel, weighted by
//! its duration in seconds and cut off at three sigma. Rendering to an
//! image happens in the render engine; this module only builds the grid.

use gazekit_session_model::fixation::Fixation;

/// Canvas and kernel settings.
#[derive(Debug, Clone, Copy)]
pub struct HeatmapConfig {
    /// Canvas width in pixels.
    pub width: usize,
    /// Canvas height in pixels.
    pub height: usize,
    /// Gaussian spread in pixels. Values below 1 are treated as 1.
    pub sigma: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            sigma: 50.0,
        }
    }
}

/// A per-pixel density grid, row-major.
#[derive(Debug, Clone)]
pub struct HeatmapGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<f64>,
    pub max_density: f64,
}

impl HeatmapGrid {
    pub fn from_fixations(fixations: &[Fixation], config: HeatmapConfig) -> Self {
        let width = config.width.max(1);
        let height = config.height.max(1);
        let mut cells = vec![0.0; width * height];

        let sigma = if config.sigma.is_finite() {
            config.sigma.max(1.0)
        } else {
            1.0
        };
        // the window never needs to reach past the canvas
        let radius = (3.0 * sigma).min(width.max(height) as f64) as i64;
        let two_sigma_sq = 2.0 * sigma * sigma;

        let mut off_canvas = 0usize;
        for fixation in fixations {
            // truncate toward zero like an integer cast of the centroid
            let cx = fixation.x.trunc() as i64;
            let cy = fixation.y.trunc() as i64;
            if cx < 0 || cy < 0 || cx >= width as i64 || cy >= height as i64 {
                off_canvas += 1;
                continue;
            }

            let weight = fixation.duration as f64 / 1000.0;

            let y_start = (cy - radius).max(0);
            let y_end = (cy + radius).min(height as i64);
            let x_start = (cx - radius).max(0);
            let x_end = (cx + radius).min(width as i64);

            for py in y_start..y_end {
                let dy = (py - cy) as f64;
                let row = py as usize * width;
                for px in x_start..x_end {
                    let dx = (px - cx) as f64;
                    let d2 = dx * dx + dy * dy;
                    cells[row + px as usize] += weight * (-d2 / two_sigma_sq).exp();
                }
            }
        }

        if off_canvas > 0 {
            tracing::debug!(off_canvas, "Skipped fixations outside the heatmap canvas");
        }

        let max_density = cells.iter().copied().fold(0.0_f64, f64::max);
        Self {
            width,
            height,
            cells,
            max_density,
        }
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Cell value scaled so the hottest cell is 1.0.
    pub fn normalized_cell(&self, col: usize, row: usize) -> Option<f64> {
        let value = self.cell(col, row)?;
        if self.max_density <= 0.0 {
            return Some(0.0);
        }
        Some(value / self.max_density)
    }

    /// Position of the hottest cell, or `None` for an empty grid.
    pub fn hotspot(&self) -> Option<(usize, usize)> {
        if self.max_density <= 0.0 {
            return None;
        }
        self.cells
            .iter()
            .position(|v| *v == self.max_density)
            .map(|idx| (idx % self.width, idx / self.width))
    }
}
