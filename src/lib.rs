//! Gifavatar turns a cutout photo into a looping animated GIF avatar.
//!
//! A render job flows through a few small stages:
//!
//! - decode the cutout and prepare a [`Sprite`] (contain-fit, zoom, outline via [`apply_stroke`])
//! - pose it per frame with the motion sampler ([`sample`])
//! - compose frames with the deterministic backend ([`synthesize_animation`]) or capture a live,
//!   already animating surface ([`capture_as_animation`])
//! - hand frames to a [`FrameSink`], usually the looping [`GifSink`]
//!
//! [`render_avatar`] and [`render_avatar_live`] run the whole chain in memory.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod animation;
/// Live-Capture Frame Backend.
pub mod capture;
pub(crate) mod effects;
/// Encoder Adapter sinks.
pub mod encode;
/// Render jobs and end-to-end entry points.
pub mod job;
pub(crate) mod raster;
/// Sprite preparation, compositing and the deterministic backend.
pub mod render;

pub use crate::foundation::core::{
    Affine, Canvas, DEFAULT_FPS, DEFAULT_FRAME_PX, DEFAULT_STILL_LEAD_SECS,
    DEFAULT_TOTAL_DURATION_SECS, FrameIndex, MAX_ANIMATION_FRAMES, MAX_FPS, Point, Rgb8,
    TimingConfig, Transform, Vec2,
};
pub use crate::foundation::error::{GifavatarError, GifavatarResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::sampler::{LoopClock, SampleCtx, sample, sample_body};
pub use crate::animation::style::{MotionStyle, PanDirection};
pub use crate::assets::decode::{decode_source, decode_source_path};
pub use crate::capture::live::{CaptureOpts, LiveSurface, capture_as_animation};
pub use crate::capture::sampled::{DEFAULT_LOOP_PAUSE_SECS, DetachHandle, SampledSurface};
pub use crate::effects::stroke::{
    MAX_STROKE_WEIGHT_PX, StrokeConfig, apply_stroke, disc_offsets, find_edges,
};
pub use crate::encode::gif::{
    DEFAULT_GIF_QUALITY, EncodedAnimation, GIF_DELAY_UNIT_MS, GifSink, GifSinkOpts, encode_gif,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::job::config::{LiveConfig, RenderJob};
pub use crate::job::pipeline::{
    render_avatar, render_avatar_blocking, render_avatar_image, render_avatar_live,
};
pub use crate::raster::buffer::{CanvasBuffer, RasterBuffer};
pub use crate::render::composite::{composite_sprite, over, sprite_affine};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::pipeline::{
    AvatarScene, RenderStats, RenderThreading, synthesize_animation, synthesize_frames,
};
pub use crate::render::sprite::{Sprite, TransformConfig, prepare_sprite};
