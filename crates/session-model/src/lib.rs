//! Gazekit Session Model
//!
//! Defines the core data contracts for an eye-tracking session:
//! - **Samples:** Raw gaze points `(x, y, timestamp)` loaded from CSV
//! - **Fixations:** Clustered gaze events with centroid and duration
//! - **AOIs:** Named rectangles grouped by page, addressed by [`AoiRef`]
//! - **Reports:** Per-AOI statistics and the session summary
//!
//! Coordinates are screen pixels; timestamps are integer milliseconds.

pub mod aoi;
pub mod error;
pub mod fixation;
pub mod report;
pub mod sample;

pub use aoi::*;
pub use error::*;
pub use fixation::*;
pub use report::*;
pub use sample::*;
