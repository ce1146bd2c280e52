use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;
use tokio::time::Instant;

use crate::animation::sampler::LoopClock;
use crate::animation::style::MotionStyle;
use crate::capture::live::LiveSurface;
use crate::foundation::core::{Canvas, Rgb8, TimingConfig, Transform};
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::render::composite::composite_sprite;
use crate::render::pipeline::AvatarScene;
use crate::render::sprite::{Sprite, TransformConfig};

/// Hold at the end of each live loop before the cycle restarts, in seconds.
pub const DEFAULT_LOOP_PAUSE_SECS: f64 = 1.0;

/// Clonable switch that detaches a [`SampledSurface`] from outside the capture loop.
#[derive(Clone, Debug)]
pub struct DetachHandle(Arc<AtomicBool>);

impl DetachHandle {
    /// Mark the surface as gone; the next capture step fails.
    pub fn detach(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Live surface whose pose is the motion sampler evaluated on a running clock.
///
/// The clock starts when the surface is created, so capture observes an animation that is
/// already in progress. With the still lead-in disabled each cycle starts at the first
/// animated pose, like the deterministic body. Frames keep a transparent background.
pub struct SampledSurface {
    sprite: Sprite,
    style: MotionStyle,
    timing: TimingConfig,
    transform: TransformConfig,
    clock: LoopClock,
    started: Instant,
    attached: Arc<AtomicBool>,
}

impl SampledSurface {
    /// Start animating `sprite` now.
    pub fn new(
        sprite: Sprite,
        style: MotionStyle,
        timing: TimingConfig,
        transform: TransformConfig,
        pause_secs: f64,
    ) -> Self {
        let clock = LoopClock::new(&timing, pause_secs);
        let clock = if transform.enable_still_frame {
            clock
        } else {
            clock.skipping_lead(&timing)
        };
        Self {
            sprite,
            style,
            clock,
            timing,
            transform,
            started: Instant::now(),
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Handle that detaches this surface.
    pub fn detach_handle(&self) -> DetachHandle {
        DetachHandle(Arc::clone(&self.attached))
    }

    /// Sampler time right now.
    pub fn sampler_time(&self) -> f64 {
        self.clock.sampler_time(self.started.elapsed().as_secs_f64())
    }

    /// Pose at sampler time `t`, static placement included.
    pub fn transform_at(&self, t: f64) -> Transform {
        AvatarScene {
            sprite: &self.sprite,
            style: self.style,
            timing: self.timing,
            transform: self.transform,
            background: Rgb8::BLACK,
        }
        .transform_at(t)
    }

    fn raster_at(&self, t: f64, scale: f64) -> GifavatarResult<RgbaImage> {
        let size = (f64::from(self.transform.output_size) * scale).round();
        if !(1.0..=f64::from(u16::MAX)).contains(&size) {
            return Err(GifavatarError::render_context(format!(
                "cannot rasterize at scale {scale}: {size}px surface"
            )));
        }
        let mut tr = self.transform_at(t);
        tr.x *= scale;
        tr.y *= scale;
        tr.scale *= scale;
        composite_sprite(&self.sprite, &tr, Canvas::square(size as u32), None)?.to_image()
    }
}

#[async_trait::async_trait]
impl LiveSurface for SampledSurface {
    async fn rasterize(&mut self, scale: f64) -> GifavatarResult<RgbaImage> {
        if !self.is_attached() {
            return Err(GifavatarError::capture_aborted("surface detached"));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GifavatarError::validation(
                "rasterize scale must be finite and > 0",
            ));
        }
        let t = self.sampler_time();
        let img = self.raster_at(t, scale)?;
        // Rasterization is a suspension point.
        tokio::task::yield_now().await;
        Ok(img)
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/sampled.rs"]
mod tests;
