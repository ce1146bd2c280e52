use image::RgbaImage;

use crate::foundation::error::{GifavatarError, GifavatarResult};

/// Decode encoded image bytes (PNG, JPEG, GIF, WebP, ...) into straight-alpha RGBA8.
///
/// Animated sources contribute their first frame only.
pub fn decode_source(bytes: &[u8]) -> GifavatarResult<RgbaImage> {
    if bytes.is_empty() {
        return Err(GifavatarError::image_decode("source image is empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| GifavatarError::image_decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(GifavatarError::image_decode("source image has zero size"));
    }
    tracing::debug!(width, height, "decoded source image");
    Ok(rgba)
}

/// Read and decode a source image from disk.
pub fn decode_source_path(path: impl AsRef<std::path::Path>) -> GifavatarResult<RgbaImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        GifavatarError::image_decode(format!("read source image '{}': {e}", path.display()))
    })?;
    decode_source(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
