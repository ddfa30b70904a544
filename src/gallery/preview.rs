// src/gallery/preview.rs

use std::path::Path;

use image::RgbaImage;

use crate::error::StudioError;

/// Bounding box of gallery previews.
pub const PREVIEW_SIZE: (u32, u32) = (100, 100);

/// Load the image at `path` and shrink it to fit the preview box,
/// keeping its aspect ratio.
pub fn render(path: &Path) -> Result<RgbaImage, StudioError> {
    let img = image::open(path)?;
    let (width, height) = PREVIEW_SIZE;
    if img.width() <= width && img.height() <= height {
        return Ok(img.to_rgba8());
    }
    Ok(img.thumbnail(width, height).to_rgba8())
}
