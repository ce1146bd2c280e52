use rayon::prelude::*;

use crate::animation::sampler::{SampleCtx, sample};
use crate::animation::style::{MotionStyle, PanDirection};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex, Rgb8, TimingConfig, Transform};
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::render::composite::composite_sprite;
use crate::render::frame::FrameRGBA;
use crate::render::sprite::{Sprite, TransformConfig};

/// Serial or `rayon`-parallel frame synthesis. Both produce identical bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderThreading {
    /// Compose frames on a worker pool.
    pub parallel: bool,
    /// Worker count; `None` lets `rayon` decide.
    pub threads: Option<usize>,
}

/// Counts actually used by a synthesis run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames emitted in total.
    pub frames_total: u64,
    /// Frozen lead-in frames at the start.
    pub still_frames: u64,
    /// Frames of the animated body.
    pub animated_frames: u64,
    /// Per-frame delay as stored by the sink.
    pub frame_delay_ms: u32,
}

/// Everything the deterministic backend needs for one avatar.
#[derive(Clone, Copy, Debug)]
pub struct AvatarScene<'a> {
    /// Prepared cutout; read-only while frames are composed.
    pub sprite: &'a Sprite,
    /// Motion curve.
    pub style: MotionStyle,
    /// Frame rate and cycle length.
    pub timing: TimingConfig,
    /// Static placement and output size.
    pub transform: TransformConfig,
    /// Solid frame background.
    pub background: Rgb8,
}

impl AvatarScene<'_> {
    /// Output canvas (square, `transform.output_size`).
    pub fn canvas(&self) -> Canvas {
        Canvas::square(self.transform.output_size)
    }

    /// Frame counts and delay for this scene.
    pub fn stats(&self) -> RenderStats {
        let still_frames = if self.transform.enable_still_frame {
            self.timing.still_frame_count()
        } else {
            0
        };
        let animated_frames = self.timing.animation_frame_count();
        RenderStats {
            frames_total: still_frames + animated_frames,
            still_frames,
            animated_frames,
            frame_delay_ms: self.timing.frame_delay_ms(),
        }
    }

    /// Transform of body frame `i`, static placement included.
    ///
    /// Sampler time is `i / fps + still_lead`, so the sampler's own lead-in check never freezes
    /// the body a second time.
    pub fn animated_transform(&self, i: u64) -> Transform {
        self.transform_at(self.timing.frames_to_secs(i) + self.timing.still_lead_secs)
    }

    /// Placement at sampler time `t`: the sampled motion combined with the static placement.
    pub fn transform_at(&self, t: f64) -> Transform {
        let ctx = SampleCtx::new(&self.timing, self.transform.output_size);
        let mut sampled = sample(self.style, t, &ctx);
        if self.style == MotionStyle::Pan {
            sampled.x *= PanDirection::from_position_hint(self.transform.position_x).sign();
        }
        self.sprite.base.combine(sampled)
    }

    /// Transform of absolute frame `idx` (lead-in frames use the static placement).
    pub fn frame_transform(&self, idx: FrameIndex) -> Transform {
        let still = self.stats().still_frames;
        if idx.0 < still {
            self.sprite.base
        } else {
            self.animated_transform(idx.0 - still)
        }
    }

    /// Compose absolute frame `idx`.
    pub fn render_frame(&self, idx: FrameIndex) -> GifavatarResult<FrameRGBA> {
        let stats = self.stats();
        if idx.0 >= stats.frames_total {
            return Err(GifavatarError::validation(format!(
                "frame index {} out of range (total {})",
                idx.0, stats.frames_total
            )));
        }
        composite_sprite(
            self.sprite,
            &self.frame_transform(idx),
            self.canvas(),
            Some(self.background),
        )
    }
}

/// Body frames composed per batch before they are handed to a sink.
const STREAM_BATCH_FRAMES: u64 = 32;

fn checked_stats(scene: &AvatarScene<'_>) -> GifavatarResult<RenderStats> {
    scene.timing.validate()?;
    scene.transform.validate()?;
    let stats = scene.stats();
    if stats.frames_total == 0 {
        return Err(GifavatarError::validation("animation has no frames"));
    }
    Ok(stats)
}

fn render_body(
    scene: &AvatarScene<'_>,
    range: std::ops::Range<u64>,
    pool: Option<&rayon::ThreadPool>,
) -> GifavatarResult<Vec<FrameRGBA>> {
    let canvas = scene.canvas();
    let body = |i: u64| -> GifavatarResult<FrameRGBA> {
        composite_sprite(
            scene.sprite,
            &scene.animated_transform(i),
            canvas,
            Some(scene.background),
        )
    };
    match pool {
        Some(pool) => pool.install(|| range.into_par_iter().map(body).collect()),
        None => range.map(body).collect(),
    }
}

/// Compose every frame of `scene` in output order.
///
/// Every frame is held in memory; [`synthesize_animation`] streams instead.
#[tracing::instrument(skip(scene), fields(style = %scene.style))]
pub fn synthesize_frames(
    scene: &AvatarScene<'_>,
    threading: &RenderThreading,
) -> GifavatarResult<(Vec<FrameRGBA>, RenderStats)> {
    let stats = checked_stats(scene)?;
    let pool = threading
        .parallel
        .then(|| build_thread_pool(threading.threads))
        .transpose()?;

    let mut out = Vec::with_capacity(stats.frames_total as usize);
    if stats.still_frames > 0 {
        let still = scene.render_frame(FrameIndex(0))?;
        for _ in 1..stats.still_frames {
            out.push(still.clone());
        }
        out.push(still);
    }
    out.extend(render_body(scene, 0..stats.animated_frames, pool.as_ref())?);

    tracing::debug!(
        frames = stats.frames_total,
        still = stats.still_frames,
        parallel = threading.parallel,
        "frames synthesized"
    );
    Ok((out, stats))
}

/// Compose every frame and stream them into `sink` in batches.
///
/// Configuration is checked before the sink is started. A compositing or encoding failure
/// returns early without finalizing the sink. The returned delay is the one the sink stores.
#[tracing::instrument(skip(scene, sink), fields(style = %scene.style))]
pub fn synthesize_animation(
    scene: &AvatarScene<'_>,
    threading: &RenderThreading,
    sink: &mut dyn FrameSink,
) -> GifavatarResult<RenderStats> {
    let mut stats = checked_stats(scene)?;
    let pool = threading
        .parallel
        .then(|| build_thread_pool(threading.threads))
        .transpose()?;
    let still = if stats.still_frames > 0 {
        Some(scene.render_frame(FrameIndex(0))?)
    } else {
        None
    };

    let canvas = scene.canvas();
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        repeat_forever: true,
    })?;

    let delay_ms = stats.frame_delay_ms;
    let mut next = 0u64;
    if let Some(still) = &still {
        for _ in 0..stats.still_frames {
            sink.push_frame(FrameIndex(next), still, delay_ms)?;
            next += 1;
        }
    }
    let mut start = 0u64;
    while start < stats.animated_frames {
        let end = (start + STREAM_BATCH_FRAMES).min(stats.animated_frames);
        for frame in render_body(scene, start..end, pool.as_ref())? {
            sink.push_frame(FrameIndex(next), &frame, delay_ms)?;
            next += 1;
        }
        start = end;
    }
    sink.end()?;

    stats.frame_delay_ms = sink.stored_delay_ms(delay_ms);
    tracing::debug!(
        frames = stats.frames_total,
        still = stats.still_frames,
        delay_ms = stats.frame_delay_ms,
        "animation streamed"
    );
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> GifavatarResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(GifavatarError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        GifavatarError::Other(anyhow::Error::new(e).context("failed to build rayon thread pool"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
