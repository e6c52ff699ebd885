//! Artwork helpers
//!
//! Small utilities for embedded cover images: MIME sniffing for pictures
//! whose tag does not declare a type, and dimension probing for the
//! rendering surface.

use bytes::Bytes;
use tracing::debug;

use crate::error::{MetadataError, Result};

/// Detect the MIME type of an image from its magic bytes.
pub fn sniff_mime(data: &Bytes) -> Option<String> {
    if data.len() < 12 {
        return None;
    }

    match &data[0..4] {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, _] => Some("image/jpeg".to_string()),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47] => Some("image/png".to_string()),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38] => Some("image/gif".to_string()),
        // WEBP: 52 49 46 46 ... 57 45 42 50
        [0x52, 0x49, 0x46, 0x46] if &data[8..12] == b"WEBP" => Some("image/webp".to_string()),
        // BMP: 42 4D
        [0x42, 0x4D, _, _] => Some("image/bmp".to_string()),
        _ => None,
    }
}

/// Decode an image far enough to learn its pixel dimensions.
pub fn probe_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let image = image::load_from_memory(data)
        .map_err(|e| MetadataError::ArtworkError(format!("Failed to decode image: {}", e)))?;

    let dimensions = (image.width(), image.height());
    debug!(width = dimensions.0, height = dimensions.1, "Probed artwork dimensions");

    Ok(dimensions)
}
