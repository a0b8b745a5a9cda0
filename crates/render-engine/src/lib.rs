//! Gazekit Render Engine
//!
//! Turns fixation analysis results into PNG plots with a JSON sidecar
//! carrying the data that is not drawn as pixels (sequence labels, AOI
//! names, density peak).
//!
//! # Pipeline
//!
//! ```text
//! fixations ──┬── HeatmapGrid ── colormap ── blend over background ──┐
//!             │                                                      ├── AOI outlines ── plot.png
//!             └── Scanpath ───── saccade lines + fixation discs ─────┘                   plot.json
//! ```

pub mod export;
pub mod heatmap;
pub mod overlay;
pub mod scanpath;

pub use export::*;
pub use heatmap::{render_heatmap, HeatmapStyle};
pub use scanpath::render_scanpath;
