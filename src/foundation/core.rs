use crate::foundation::error::{GifavatarError, GifavatarResult};

pub use kurbo::{Affine, Point, Vec2};

/// Default output edge length of the square avatar, in pixels.
pub const DEFAULT_FRAME_PX: u32 = 400;
/// Default frames per second of the encoded animation.
pub const DEFAULT_FPS: u32 = 12;
/// Default length of one animation cycle, in seconds (lead-in included).
pub const DEFAULT_TOTAL_DURATION_SECS: f64 = 5.5;
/// Default frozen lead-in before the animated body starts, in seconds.
pub const DEFAULT_STILL_LEAD_SECS: f64 = 0.5;
/// Highest accepted frame rate; GIF delays cannot go below one centisecond.
pub const MAX_FPS: u32 = 100;
/// Most frames one animation may contain, lead-in included.
pub const MAX_ANIMATION_FRAMES: u64 = 1000;

/// Absolute 0-based frame index in the encoded animation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Square canvas with edge length `size`.
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// Canvas center in pixel coordinates.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Number of bytes of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> GifavatarResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| GifavatarError::validation("canvas buffer size overflow"))
    }
}

/// Opaque RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Straight-alpha RGBA pixel of this color at full opacity.
    pub const fn opaque(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Per-frame geometric transform produced by the motion sampler.
///
/// Translation is in pixels measured from the frame center, rotation in degrees, scale is a
/// uniform multiplier and opacity a multiplier in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels (positive is down).
    pub y: f64,
    /// Rotation in degrees (clockwise on screen).
    pub rotate_deg: f64,
    /// Uniform scale multiplier.
    pub scale: f64,
    /// Opacity multiplier.
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform `{0, 0, 0, 1, 1}`.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        rotate_deg: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    /// Combine a static configuration transform with a sampled animation transform.
    ///
    /// Translation and rotation are summed, scale is multiplied and the sampled opacity is used
    /// as-is. Neither input is modified.
    pub fn combine(self, sampled: Transform) -> Transform {
        Transform {
            x: self.x + sampled.x,
            y: self.y + sampled.y,
            rotate_deg: self.rotate_deg + sampled.rotate_deg,
            scale: self.scale * sampled.scale,
            opacity: sampled.opacity.clamp(0.0, 1.0),
        }
    }

    /// Return `true` when every component matches the identity within `eps`.
    pub fn is_identity(self, eps: f64) -> bool {
        let id = Self::IDENTITY;
        (self.x - id.x).abs() <= eps
            && (self.y - id.y).abs() <= eps
            && (self.rotate_deg - id.rotate_deg).abs() <= eps
            && (self.scale - id.scale).abs() <= eps
            && (self.opacity - id.opacity).abs() <= eps
    }
}

/// Frame rate and duration of one animation cycle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Frames per second, must be non-zero.
    pub fps: u32,
    /// Total cycle length in seconds.
    pub total_duration_secs: f64,
    /// Frozen identity prefix in seconds; must be shorter than the total.
    pub still_lead_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            total_duration_secs: DEFAULT_TOTAL_DURATION_SECS,
            still_lead_secs: DEFAULT_STILL_LEAD_SECS,
        }
    }
}

impl TimingConfig {
    /// Check the timing invariants.
    pub fn validate(&self) -> GifavatarResult<()> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(GifavatarError::validation(format!(
                "fps must be in 1..={MAX_FPS}"
            )));
        }
        if !self.total_duration_secs.is_finite() || self.total_duration_secs <= 0.0 {
            return Err(GifavatarError::validation(
                "total_duration_secs must be finite and > 0",
            ));
        }
        if !self.still_lead_secs.is_finite() || self.still_lead_secs < 0.0 {
            return Err(GifavatarError::validation(
                "still_lead_secs must be finite and >= 0",
            ));
        }
        if self.still_lead_secs >= self.total_duration_secs {
            return Err(GifavatarError::validation(
                "still_lead_secs must be < total_duration_secs",
            ));
        }
        let frames = self
            .still_frame_count()
            .saturating_add(self.animation_frame_count());
        if frames > MAX_ANIMATION_FRAMES {
            return Err(GifavatarError::validation(format!(
                "animation would have {frames} frames, at most {MAX_ANIMATION_FRAMES} are allowed"
            )));
        }
        Ok(())
    }

    /// Length of the animated body (total minus lead-in).
    pub fn body_secs(&self) -> f64 {
        self.total_duration_secs - self.still_lead_secs
    }

    /// Declared per-frame delay, `round(1000 / fps)`.
    pub fn frame_delay_ms(&self) -> u32 {
        (1000.0 / f64::from(self.fps.max(1))).round() as u32
    }

    /// Number of frozen lead-in frames, `round(fps * still_lead)`.
    pub fn still_frame_count(&self) -> u64 {
        (f64::from(self.fps) * self.still_lead_secs).round().max(0.0) as u64
    }

    /// Number of animated frames, `round(fps * total_duration)`.
    pub fn animation_frame_count(&self) -> u64 {
        (f64::from(self.fps) * self.total_duration_secs)
            .round()
            .max(0.0) as u64
    }

    /// Convert a frame count into seconds at this frame rate.
    pub fn frames_to_secs(&self, frames: u64) -> f64 {
        frames as f64 / f64::from(self.fps.max(1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
