// src/novelai/archive.rs

use std::io::{Cursor, Read};

use image::ImageFormat;

use crate::error::StudioError;

/// The image found in a generation response.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl DecodedImage {
    /// The image as PNG bytes. PNG input comes back untouched; anything
    /// else is re-encoded so the stored file matches its extension.
    pub fn into_png(self) -> Result<Vec<u8>, StudioError> {
        if self.format == ImageFormat::Png {
            return Ok(self.bytes);
        }

        let img = image::load_from_memory_with_format(&self.bytes, self.format)?;
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)?;
        tracing::debug!("Re-encoded {:?} image as PNG", self.format);
        Ok(out.into_inner())
    }
}

/// Pull the image out of a zip response.
///
/// The service sends one image per request, so only the first entry is
/// read, whatever its name. Its bytes are returned untouched once they
/// have been confirmed to decode as an image.
pub fn decode(body: &[u8]) -> Result<DecodedImage, StudioError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(body))?;

    if archive.is_empty() {
        return Err(StudioError::DecodeFailure("archive is empty".to_string()));
    }

    let mut entry = archive.by_index(0)?;
    let name = entry.name().to_string();
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| StudioError::DecodeFailure(format!("failed to read {}: {}", name, e)))?;

    let format = image::guess_format(&bytes)
        .map_err(|_| StudioError::DecodeFailure(format!("{} is not an image", name)))?;
    image::load_from_memory_with_format(&bytes, format)?;

    tracing::debug!("Decoded {} ({:?}, {} bytes)", name, format, bytes.len());
    Ok(DecodedImage { bytes, format })
}
