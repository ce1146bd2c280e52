use std::time::Duration;

use image::RgbaImage;

use crate::encode::gif::DEFAULT_GIF_QUALITY;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, MAX_ANIMATION_FRAMES, MAX_FPS, TimingConfig};
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::render::frame::FrameRGBA;
use crate::render::pipeline::RenderStats;

/// A visual element that is already animating and can be rasterized at any moment.
#[async_trait::async_trait]
pub trait LiveSurface: Send {
    /// Rasterize the current visual state at pixel density `scale` on a transparent background.
    async fn rasterize(&mut self, scale: f64) -> GifavatarResult<RgbaImage>;

    /// `false` once the element is gone; further captures must fail.
    fn is_attached(&self) -> bool;
}

/// Capture request for [`capture_as_animation`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureOpts {
    /// Requested capture length in milliseconds.
    pub duration_ms: u64,
    /// Capture rate.
    pub fps: u32,
    /// Palette quality handed to the encoder (`1` best to `30` fastest).
    pub quality: u8,
    /// Pixel density multiplier for rasterization.
    pub scale: f64,
}

impl Default for CaptureOpts {
    fn default() -> Self {
        Self::from_timing(&TimingConfig::default(), DEFAULT_GIF_QUALITY)
    }
}

impl CaptureOpts {
    /// Capture one full cycle of `timing`.
    pub fn from_timing(timing: &TimingConfig, quality: u8) -> Self {
        Self {
            duration_ms: (timing.total_duration_secs * 1000.0).round().max(0.0) as u64,
            fps: timing.fps,
            quality,
            scale: 1.0,
        }
    }

    /// Check the capture parameters.
    pub fn validate(&self) -> GifavatarResult<()> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(GifavatarError::validation(format!(
                "capture fps must be in 1..={MAX_FPS}"
            )));
        }
        if self.duration_ms == 0 {
            return Err(GifavatarError::validation("capture duration_ms must be > 0"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(GifavatarError::validation(
                "capture scale must be finite and > 0",
            ));
        }
        if self.total_frames() > MAX_ANIMATION_FRAMES {
            return Err(GifavatarError::validation(format!(
                "capture would take {} frames, at most {MAX_ANIMATION_FRAMES} are allowed",
                self.total_frames()
            )));
        }
        Ok(())
    }

    /// Declared per-frame delay, `round(1000 / fps)`.
    pub fn frame_delay_ms(&self) -> u32 {
        (1000.0 / f64::from(self.fps.max(1))).round() as u32
    }

    /// Number of frames to capture, `round(duration_ms / frame_delay_ms)`.
    pub fn total_frames(&self) -> u64 {
        let delay = self.frame_delay_ms().max(1);
        (self.duration_ms as f64 / f64::from(delay)).round() as u64
    }
}

/// Capture `surface` frame by frame into `sink`.
///
/// Frames are captured sequentially with a `frame_delay_ms` sleep between captures (none after
/// the last). Rasterization time is not deducted from the wait, so real elapsed time can exceed
/// `duration_ms`; the frame count and declared delay are exact. A detached surface fails the
/// whole capture with `CaptureAborted` and the sink is never finalized.
#[tracing::instrument(skip(surface, sink))]
pub async fn capture_as_animation(
    surface: &mut dyn LiveSurface,
    opts: &CaptureOpts,
    sink: &mut dyn FrameSink,
) -> GifavatarResult<RenderStats> {
    opts.validate()?;
    let delay_ms = opts.frame_delay_ms();
    let total = opts.total_frames();
    if total == 0 {
        return Err(GifavatarError::validation(
            "capture duration is shorter than one frame",
        ));
    }

    for i in 0..total {
        if !surface.is_attached() {
            return Err(GifavatarError::capture_aborted(format!(
                "surface detached before frame {i} of {total}"
            )));
        }
        let img = surface.rasterize(opts.scale).await?;
        let frame = FrameRGBA::from_image(img);
        if i == 0 {
            sink.begin(SinkConfig {
                width: frame.width,
                height: frame.height,
                repeat_forever: true,
            })?;
        }
        sink.push_frame(FrameIndex(i), &frame, delay_ms)?;
        tracing::trace!(frame = i, "captured");

        if i + 1 < total {
            tokio::time::sleep(Duration::from_millis(u64::from(delay_ms))).await;
        }
    }
    sink.end()?;

    let stored_ms = sink.stored_delay_ms(delay_ms);
    tracing::debug!(frames = total, delay_ms, stored_ms, "capture finished");
    Ok(RenderStats {
        frames_total: total,
        still_frames: 0,
        animated_frames: total,
        frame_delay_ms: stored_ms,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/capture/live.rs"]
mod tests;
