use image::RgbaImage;

use crate::foundation::core::Canvas;
use crate::foundation::error::{GifavatarError, GifavatarResult};

/// Straight-alpha RGBA8 pixel grid, row-major.
///
/// Pixel algorithms are written once against this trait and run unchanged on every buffer kind.
pub trait RasterBuffer: Clone {
    /// Allocate a fully transparent buffer.
    fn new_transparent(width: u32, height: u32) -> GifavatarResult<Self>;
    /// Width in pixels.
    fn width(&self) -> u32;
    /// Height in pixels.
    fn height(&self) -> u32;
    /// Read the pixel at `(x, y)`; both must be in bounds.
    fn pixel(&self, x: u32, y: u32) -> [u8; 4];
    /// Overwrite the pixel at `(x, y)`; both must be in bounds.
    fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]);

    /// Alpha channel of the pixel at `(x, y)`.
    fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y)[3]
    }
}

impl RasterBuffer for RgbaImage {
    fn new_transparent(width: u32, height: u32) -> GifavatarResult<Self> {
        Canvas { width, height }.rgba_len()?;
        Ok(RgbaImage::new(width, height))
    }

    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.get_pixel(x, y).0
    }

    fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        self.put_pixel(x, y, image::Rgba(px));
    }
}

/// Raw RGBA8 buffer shaped like a browser canvas `ImageData`.
///
/// This is the buffer kind the interactive preview works on; [`RgbaImage`] is the one the
/// server-side renderer uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CanvasBuffer {
    /// Acquire a transparent drawing surface of the given size.
    pub fn new(width: u32, height: u32) -> GifavatarResult<Self> {
        if width == 0 || height == 0 {
            return Err(GifavatarError::render_context(format!(
                "cannot acquire a {width}x{height} drawing surface"
            )));
        }
        let len = Canvas { width, height }
            .rgba_len()
            .map_err(|e| GifavatarError::render_context(e.to_string()))?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wrap existing RGBA8 bytes; the length must match `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> GifavatarResult<Self> {
        let expected = Canvas { width, height }.rgba_len()?;
        if data.len() != expected {
            return Err(GifavatarError::validation(format!(
                "canvas data length {} does not match {width}x{height}x4",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy an [`RgbaImage`] into a canvas buffer.
    pub fn from_image(img: &RgbaImage) -> GifavatarResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_rgba(w, h, img.as_raw().clone())
    }

    /// Convert back into an [`RgbaImage`].
    pub fn into_image(self) -> GifavatarResult<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| GifavatarError::validation("canvas data does not fit its dimensions"))
    }

    /// Borrow the raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

impl RasterBuffer for CanvasBuffer {
    fn new_transparent(width: u32, height: u32) -> GifavatarResult<Self> {
        Self::new(width, height)
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
