use image::RgbaImage;

use crate::assets::decode::decode_source;
use crate::capture::live::capture_as_animation;
use crate::capture::sampled::SampledSurface;
use crate::encode::gif::{EncodedAnimation, GifSink};
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::job::config::RenderJob;
use crate::render::pipeline::synthesize_animation;
use crate::render::sprite::prepare_sprite;

/// Decode `source`, prepare the sprite and encode the deterministic animation in memory.
///
/// Nothing is returned unless every frame was composed and the GIF was finalized.
#[tracing::instrument(skip(source, job), fields(style = %job.style, source_len = source.len()))]
pub fn render_avatar(source: &[u8], job: &RenderJob) -> GifavatarResult<EncodedAnimation> {
    job.validate()?;
    let img = decode_source(source)?;
    render_avatar_image(&img, job)
}

/// [`render_avatar`] for an already decoded cutout.
pub fn render_avatar_image(img: &RgbaImage, job: &RenderJob) -> GifavatarResult<EncodedAnimation> {
    job.validate()?;
    let sprite = prepare_sprite(img, &job.transform, &job.stroke)?;
    let scene = job.scene(&sprite);

    let mut bytes = Vec::new();
    let stats = {
        let mut sink = GifSink::new(&mut bytes, job.gif_opts());
        synthesize_animation(&scene, &job.threading, &mut sink)?
    };
    tracing::info!(
        frames = stats.frames_total,
        delay_ms = stats.frame_delay_ms,
        bytes = bytes.len(),
        "avatar rendered"
    );
    Ok(EncodedAnimation {
        bytes,
        frame_count: stats.frames_total,
        frame_delay_ms: stats.frame_delay_ms,
    })
}

/// [`render_avatar`] on the blocking thread pool so an async caller is not stalled.
pub async fn render_avatar_blocking(
    source: Vec<u8>,
    job: RenderJob,
) -> GifavatarResult<EncodedAnimation> {
    tokio::task::spawn_blocking(move || render_avatar(&source, &job))
        .await
        .map_err(|e| {
            GifavatarError::Other(anyhow::Error::new(e).context("render worker failed"))
        })?
}

/// Render through the live-capture path: a sampler-driven surface captured in real time.
///
/// Frames keep a transparent background. Expect the call to take at least the job's duration.
#[tracing::instrument(skip(source, job), fields(style = %job.style, source_len = source.len()))]
pub async fn render_avatar_live(
    source: &[u8],
    job: &RenderJob,
) -> GifavatarResult<EncodedAnimation> {
    job.validate()?;
    let img = decode_source(source)?;
    let sprite = prepare_sprite(&img, &job.transform, &job.stroke)?;
    let mut surface = SampledSurface::new(
        sprite,
        job.style,
        job.timing,
        job.transform,
        job.live.loop_pause_secs,
    );

    let opts = job.capture_opts();
    let mut bytes = Vec::new();
    let stats = {
        let mut sink = GifSink::new(&mut bytes, job.gif_opts());
        capture_as_animation(&mut surface, &opts, &mut sink).await?
    };
    tracing::info!(
        frames = stats.frames_total,
        delay_ms = stats.frame_delay_ms,
        bytes = bytes.len(),
        "avatar captured"
    );
    Ok(EncodedAnimation {
        bytes,
        frame_count: stats.frames_total,
        frame_delay_ms: stats.frame_delay_ms,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/job/pipeline.rs"]
mod tests;
