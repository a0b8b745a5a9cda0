//! Writing rendered plots to disk.

use std::path::{Path, PathBuf};

use image::RgbImage;
use serde::Serialize;

use gazekit_common::error::{GazekitError, GazekitResult};

/// Files produced by one plot export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotOutput {
    /// The PNG image.
    pub image_path: PathBuf,

    /// JSON sidecar next to the image.
    pub sidecar_path: PathBuf,
}

/// Sidecar location for an image path: same stem, `.json` extension.
pub fn sidecar_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}

/// Save `image` as PNG and `sidecar` as pretty JSON beside it.
///
/// Parent directories are created as needed. The image format follows the
/// path extension, so callers should pass a `.png` path.
pub fn write_plot<S: Serialize>(
    image: &RgbImage,
    sidecar: &S,
    image_path: &Path,
) -> GazekitResult<PlotOutput> {
    if let Some(parent) = image_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(image_path).map_err(|e| {
        GazekitError::render(format!(
            "Failed to write image {}: {e}",
            image_path.display()
        ))
    })?;

    let sidecar_path = sidecar_path_for(image_path);
    let json = serde_json::to_string_pretty(sidecar)?;
    std::fs::write(&sidecar_path, json)?;

    tracing::info!(
        image = %image_path.display(),
        sidecar = %sidecar_path.display(),
        width = image.width(),
        height = image.height(),
        "Wrote plot"
    );

    Ok(PlotOutput {
        image_path: image_path.to_path_buf(),
        sidecar_path,
    })
}
