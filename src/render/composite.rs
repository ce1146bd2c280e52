use kurbo::{Affine, Point, Rect, Vec2};

use crate::foundation::core::{Canvas, Rgb8, Transform};
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};
use crate::render::frame::FrameRGBA;
use crate::render::sprite::Sprite;

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over blend of premultiplied pixels with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = u16::from(unit_to_u8(f64::from(opacity)));
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Placement of the sprite in frame space, applied scale, then rotate, then translate.
///
/// The translation is measured from the frame center; the sprite's own center is the pivot.
pub fn sprite_affine(sprite_w: u32, sprite_h: u32, tr: &Transform, canvas: Canvas) -> Affine {
    let pivot = Vec2::new(f64::from(sprite_w) / 2.0, f64::from(sprite_h) / 2.0);
    let dest = canvas.center().to_vec2() + Vec2::new(tr.x, tr.y);
    Affine::translate(dest)
        * Affine::rotate(tr.rotate_deg.to_radians())
        * Affine::scale(tr.scale)
        * Affine::translate(-pivot)
}

/// Draw `sprite` under transform `tr` onto a fresh frame.
///
/// With `background = Some(color)` the frame is opaque; with `None` it keeps transparency (used by
/// live capture). Output is straight alpha.
pub fn composite_sprite(
    sprite: &Sprite,
    tr: &Transform,
    canvas: Canvas,
    background: Option<Rgb8>,
) -> GifavatarResult<FrameRGBA> {
    let len = canvas.rgba_len()?;
    let mut data = match background {
        Some(bg) => bg.opaque().repeat(len / 4),
        None => vec![0u8; len],
    };

    let drawable = tr.scale.is_finite()
        && tr.scale > 0.0
        && tr.opacity > 0.0
        && tr.x.is_finite()
        && tr.y.is_finite()
        && tr.rotate_deg.is_finite();
    if drawable && sprite.width > 0 && sprite.height > 0 {
        draw_sprite(&mut data, sprite, tr, canvas)?;
    }

    if background.is_none() {
        unpremultiply_rgba8_in_place(&mut data);
    }
    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    })
}

fn draw_sprite(
    dst: &mut [u8],
    sprite: &Sprite,
    tr: &Transform,
    canvas: Canvas,
) -> GifavatarResult<()> {
    let expected = (sprite.width as usize)
        .checked_mul(sprite.height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| GifavatarError::validation("sprite buffer size overflow"))?;
    if sprite.rgba8_premul.len() != expected {
        return Err(GifavatarError::validation(
            "sprite pixel data does not match its dimensions",
        ));
    }

    let affine = sprite_affine(sprite.width, sprite.height, tr, canvas);
    let inv = affine.inverse();
    let bbox = affine.transform_rect_bbox(Rect::new(
        0.0,
        0.0,
        f64::from(sprite.width),
        f64::from(sprite.height),
    ));
    let x0 = bbox.x0.floor().max(0.0) as u32;
    let y0 = bbox.y0.floor().max(0.0) as u32;
    let x1 = (bbox.x1.ceil().max(0.0) as u32).min(canvas.width);
    let y1 = (bbox.y1.ceil().max(0.0) as u32).min(canvas.height);
    let opacity = tr.opacity.clamp(0.0, 1.0) as f32;

    for py in y0..y1 {
        for px in x0..x1 {
            let p = inv * Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
            let s = sample_bilinear(sprite, p.x - 0.5, p.y - 0.5);
            if s[3] == 0 {
                continue;
            }
            let idx = ((py as usize) * (canvas.width as usize) + (px as usize)) * 4;
            let d = [dst[idx], dst[idx + 1], dst[idx + 2], dst[idx + 3]];
            dst[idx..idx + 4].copy_from_slice(&over(d, s, opacity));
        }
    }
    Ok(())
}

/// Bilinear sample of the premultiplied sprite; outside texels are transparent.
fn sample_bilinear(sprite: &Sprite, u: f64, v: f64) -> PremulRgba8 {
    let w = i64::from(sprite.width);
    let h = i64::from(sprite.height);
    if u <= -1.0 || v <= -1.0 || u >= w as f64 || v >= h as f64 {
        return [0; 4];
    }
    let fx = u.floor();
    let fy = v.floor();
    let tx = u - fx;
    let ty = v - fy;
    let (ix, iy) = (fx as i64, fy as i64);

    let texel = |x: i64, y: i64| -> [f64; 4] {
        if x < 0 || y < 0 || x >= w || y >= h {
            return [0.0; 4];
        }
        let i = ((y * w + x) as usize) * 4;
        let d = &sprite.rgba8_premul[i..i + 4];
        [
            f64::from(d[0]),
            f64::from(d[1]),
            f64::from(d[2]),
            f64::from(d[3]),
        ]
    };

    let a = texel(ix, iy);
    let b = texel(ix + 1, iy);
    let c = texel(ix, iy + 1);
    let d = texel(ix + 1, iy + 1);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = a[i] + (b[i] - a[i]) * tx;
        let bottom = c[i] + (d[i] - c[i]) * tx;
        out[i] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
    }
    // Keep the premultiplied invariant after rounding.
    for i in 0..3 {
        out[i] = out[i].min(out[3]);
    }
    out
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
