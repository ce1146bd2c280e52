use std::sync::Arc;

use image::RgbaImage;
use image::imageops::FilterType;

use crate::effects::stroke::{StrokeConfig, apply_stroke};
use crate::foundation::core::{DEFAULT_FRAME_PX, Transform};
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::foundation::math::mul_div255_u8;

/// Static placement of the cutout inside the avatar frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Horizontal position in percent of half the frame width (`-100..=100`, 0 is centered).
    pub position_x: f64,
    /// Vertical position in percent of half the frame height (`-100..=100`, 0 is centered).
    pub position_y: f64,
    /// User zoom applied on top of the contain-fit.
    pub zoom: f64,
    /// Static rotation in degrees.
    pub rotate_deg: f64,
    /// Emit the frozen lead-in frames before the animated body.
    pub enable_still_frame: bool,
    /// Edge length of the square output in pixels.
    pub output_size: u32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            position_x: 0.0,
            position_y: 0.0,
            zoom: 1.0,
            rotate_deg: 0.0,
            enable_still_frame: true,
            output_size: DEFAULT_FRAME_PX,
        }
    }
}

impl TransformConfig {
    /// Check ranges of the placement values.
    pub fn validate(&self) -> GifavatarResult<()> {
        if self.output_size == 0 || self.output_size > 2048 {
            return Err(GifavatarError::validation(
                "output_size must be in 1..=2048",
            ));
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(GifavatarError::validation("zoom must be finite and > 0"));
        }
        for (name, v) in [
            ("position_x", self.position_x),
            ("position_y", self.position_y),
            ("rotate_deg", self.rotate_deg),
        ] {
            if !v.is_finite() {
                return Err(GifavatarError::validation(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// Static transform relative to the frame center: position offset and rotation.
    ///
    /// Zoom is baked into the sprite's pixels, so the static scale is 1.
    pub fn static_transform(&self) -> Transform {
        let half = f64::from(self.output_size) / 2.0;
        Transform {
            x: self.position_x / 100.0 * half,
            y: self.position_y / 100.0 * half,
            rotate_deg: self.rotate_deg,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

/// Pre-processed cutout shared read-only by every frame of a job.
#[derive(Clone, Debug)]
pub struct Sprite {
    /// Width in pixels (stroke padding included).
    pub width: u32,
    /// Height in pixels (stroke padding included).
    pub height: u32,
    /// Straight-alpha pixels, useful for previews and debugging.
    pub rgba8: Arc<RgbaImage>,
    /// Premultiplied RGBA8, row-major, tightly packed; what the compositor samples.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Static placement to combine with each sampled transform.
    pub base: Transform,
}

impl Sprite {
    /// Wrap an already sized image as a sprite placed by `base`.
    pub fn from_image(img: RgbaImage, base: Transform) -> Self {
        let (width, height) = img.dimensions();
        let mut premul = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut premul);
        Self {
            width,
            height,
            rgba8: Arc::new(img),
            rgba8_premul: Arc::new(premul),
            base,
        }
    }
}

/// Fit `src` inside the output square ("contain"), apply zoom, then the outline.
#[tracing::instrument(skip(src), fields(src_w = src.width(), src_h = src.height()))]
pub fn prepare_sprite(
    src: &RgbaImage,
    transform: &TransformConfig,
    stroke: &StrokeConfig,
) -> GifavatarResult<Sprite> {
    transform.validate()?;
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return Err(GifavatarError::image_decode("source image has zero size"));
    }

    let frame = f64::from(transform.output_size);
    let contain = (frame / f64::from(w)).min(frame / f64::from(h));
    let s = contain * transform.zoom;
    let nw = (f64::from(w) * s).round().clamp(1.0, 8192.0) as u32;
    let nh = (f64::from(h) * s).round().clamp(1.0, 8192.0) as u32;

    let sized = if (nw, nh) == (w, h) {
        src.clone()
    } else {
        image::imageops::resize(src, nw, nh, FilterType::Triangle)
    };
    let stroked = apply_stroke(&sized, stroke)?;
    tracing::debug!(
        width = stroked.width(),
        height = stroked.height(),
        "sprite prepared"
    );
    Ok(Sprite::from_image(stroked, transform.static_transform()))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sprite.rs"]
mod tests;
