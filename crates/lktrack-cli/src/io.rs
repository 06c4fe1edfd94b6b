use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lktrack_core::frame::Frame;
use ndarray::Array2;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "tif", "tiff", "jpg", "jpeg", "bmp", "pgm"];

/// Load an image as a grayscale frame with intensities in [0, 1].
pub fn load_frame(path: &Path, index: usize) -> Result<Frame> {
    let img = image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let raw = Array2::from_shape_vec((h as usize, w as usize), gray.into_raw())
        .with_context(|| format!("Unexpected pixel buffer in {}", path.display()))?;

    let mut frame = Frame::from_pixels(&raw, index);
    frame.data.mapv_inplace(|v| v / 65535.0);
    Ok(frame)
}

/// Image files directly inside `dir`, sorted by file name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
