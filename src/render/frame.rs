use image::RgbaImage;

use crate::foundation::error::{GifavatarError, GifavatarResult};

/// One rendered frame: straight-alpha RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Take ownership of an [`RgbaImage`]'s pixels.
    pub fn from_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Copy the pixels into an [`RgbaImage`].
    pub fn to_image(&self) -> GifavatarResult<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| GifavatarError::validation("frame data does not match its dimensions"))
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}
