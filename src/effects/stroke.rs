//! Outline ("stroke") synthesis around the opaque content of a cutout.
//!
//! Steps, identical for every [`RasterBuffer`] kind:
//!
//! 1. Pad the source by `weight` on every side (so `2 * weight` per axis) and center it.
//! 2. Mark edge pixels: alpha > 0 with an alpha == 0 8-neighbor, or lying on the padded border.
//! 3. Dilate every edge pixel by a filled disc of radius `weight`, painting only pixels that are
//!    still fully transparent.
//! 4. Composite the untouched source back on top.

use crate::foundation::core::Rgb8;
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::raster::buffer::RasterBuffer;

/// Thickest accepted outline, in output pixels.
pub const MAX_STROKE_WEIGHT_PX: u32 = 64;

/// Outline settings chosen by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// Whether an outline is drawn at all.
    pub enabled: bool,
    /// Outline thickness in output pixels.
    pub weight_px: u32,
    /// Outline color, drawn fully opaque.
    pub color: Rgb8,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            weight_px: 8,
            color: Rgb8::WHITE,
        }
    }
}

impl StrokeConfig {
    /// Outline of `weight_px` pixels in `color`.
    pub fn new(weight_px: u32, color: Rgb8) -> Self {
        Self {
            enabled: true,
            weight_px,
            color,
        }
    }

    /// `false` when synthesis is a passthrough.
    pub fn is_active(&self) -> bool {
        self.enabled && self.weight_px > 0
    }

    /// Reject outlines thicker than [`MAX_STROKE_WEIGHT_PX`].
    pub fn validate(&self) -> GifavatarResult<()> {
        if self.weight_px > MAX_STROKE_WEIGHT_PX {
            return Err(GifavatarError::validation(format!(
                "stroke weight_px must be <= {MAX_STROKE_WEIGHT_PX}, got {}",
                self.weight_px
            )));
        }
        Ok(())
    }
}

/// Draw an outline into the transparent pixels around `src`'s opaque content.
///
/// Returns a new buffer; when the stroke is inactive it is an unpadded copy of `src`.
pub fn apply_stroke<B: RasterBuffer>(src: &B, cfg: &StrokeConfig) -> GifavatarResult<B> {
    if !cfg.is_active() {
        return Ok(src.clone());
    }
    cfg.validate()?;
    let k = cfg.weight_px;
    let pad = k
        .checked_mul(2)
        .ok_or_else(|| GifavatarError::validation("stroke weight overflow"))?;
    let width = src
        .width()
        .checked_add(pad)
        .ok_or_else(|| GifavatarError::validation("stroke canvas width overflow"))?;
    let height = src
        .height()
        .checked_add(pad)
        .ok_or_else(|| GifavatarError::validation("stroke canvas height overflow"))?;

    let mut padded = B::new_transparent(width, height)?;
    blit_over(&mut padded, src, k, k);

    let edges = find_edges(&padded);
    let disc = disc_offsets(k);
    let stroke_px = cfg.color.opaque();

    let mut out = B::new_transparent(width, height)?;
    let (w, h) = (i64::from(width), i64::from(height));
    for &(ex, ey) in &edges {
        for &(dx, dy) in &disc {
            let tx = i64::from(ex) + i64::from(dx);
            let ty = i64::from(ey) + i64::from(dy);
            if tx < 0 || ty < 0 || tx >= w || ty >= h {
                continue;
            }
            let (tx, ty) = (tx as u32, ty as u32);
            if padded.alpha(tx, ty) == 0 {
                out.set_pixel(tx, ty, stroke_px);
            }
        }
    }

    blit_over(&mut out, src, k, k);
    tracing::debug!(
        weight = k,
        edges = edges.len(),
        width,
        height,
        "stroke applied"
    );
    Ok(out)
}

/// Pixels with alpha > 0 that touch transparency (8-neighborhood) or the buffer border.
pub fn find_edges<B: RasterBuffer>(buf: &B) -> Vec<(u32, u32)> {
    let (w, h) = (buf.width(), buf.height());
    let mut edges = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if buf.alpha(x, y) == 0 {
                continue;
            }
            if x == 0 || y == 0 || x + 1 == w || y + 1 == h {
                edges.push((x, y));
                continue;
            }
            let touches_transparent = NEIGHBORS_8.iter().any(|&(dx, dy)| {
                buf.alpha(x.wrapping_add_signed(dx), y.wrapping_add_signed(dy)) == 0
            });
            if touches_transparent {
                edges.push((x, y));
            }
        }
    }
    edges
}

const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Offsets within Euclidean distance `radius` of the origin, origin excluded.
pub fn disc_offsets(radius: u32) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let r2 = i64::from(r) * i64::from(r);
    let mut out = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dx == 0 && dy == 0 {
                continue;
            }
            if i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy) <= r2 {
                out.push((dx, dy));
            }
        }
    }
    out
}

/// Straight-alpha source-over of `src` into `dst` at `(ox, oy)`.
///
/// Where `dst` is transparent the source pixel is copied exactly.
fn blit_over<B: RasterBuffer>(dst: &mut B, src: &B, ox: u32, oy: u32) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            let s = src.pixel(x, y);
            if s[3] == 0 {
                continue;
            }
            let (dx, dy) = (x + ox, y + oy);
            let d = dst.pixel(dx, dy);
            dst.set_pixel(dx, dy, over_straight(d, s));
        }
    }
}

fn over_straight(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 255 || dst[3] == 0 {
        return src;
    }
    let sa = f64::from(src[3]) / 255.0;
    let da = f64::from(dst[3]) / 255.0;
    let oa = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (f64::from(src[i]) * sa + f64::from(dst[i]) * da * (1.0 - sa)) / oa;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (oa * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/stroke.rs"]
mod tests;
