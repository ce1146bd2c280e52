use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::render::frame::FrameRGBA;

/// Default palette quality; lower is better and slower.
pub const DEFAULT_GIF_QUALITY: u8 = 10;

/// GIF frame delays are stored in hundredths of a second.
pub const GIF_DELAY_UNIT_MS: u32 = 10;

/// Longest delay a GIF frame header can hold.
const GIF_MAX_DELAY_MS: u32 = u16::MAX as u32 * GIF_DELAY_UNIT_MS;

/// Options for [`GifSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifSinkOpts {
    /// Palette quantization quality, `1` (best) to `30` (fastest).
    pub quality: u8,
}

impl Default for GifSinkOpts {
    fn default() -> Self {
        Self {
            quality: DEFAULT_GIF_QUALITY,
        }
    }
}

impl GifSinkOpts {
    /// Quantizer speed accepted by the GIF codec.
    pub fn speed(self) -> i32 {
        i32::from(self.quality.clamp(1, 30))
    }

    /// Delay written to the file for a requested delay: the nearest whole centisecond, at
    /// least one.
    pub fn effective_delay_ms(self, delay_ms: u32) -> u32 {
        let cs = delay_ms.saturating_add(GIF_DELAY_UNIT_MS / 2) / GIF_DELAY_UNIT_MS;
        cs.saturating_mul(GIF_DELAY_UNIT_MS).clamp(GIF_DELAY_UNIT_MS, GIF_MAX_DELAY_MS)
    }
}

/// Writer that remembers its first IO failure.
///
/// The codec writes the GIF trailer on drop and discards errors there.
struct LatchedWriter<W> {
    inner: W,
    failure: Arc<Mutex<Option<String>>>,
}

impl<W> LatchedWriter<W> {
    fn latch(&self, e: &io::Error) {
        if let Ok(mut slot) = self.failure.lock()
            && slot.is_none()
        {
            *slot = Some(e.to_string());
        }
    }
}

impl<W: Write> Write for LatchedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).inspect_err(|e| self.latch(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().inspect_err(|e| self.latch(e))
    }
}

/// Looping animated GIF sink writing into `W`.
///
/// The trailer is written in [`FrameSink::end`]; until then the output is incomplete. A write
/// failure while finalizing, trailer included, is reported by `end`.
pub struct GifSink<W: Write + Send> {
    opts: GifSinkOpts,
    writer: Option<W>,
    encoder: Option<GifEncoder<LatchedWriter<W>>>,
    failure: Arc<Mutex<Option<String>>>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_written: u64,
}

impl<W: Write + Send> GifSink<W> {
    /// Create a sink that will encode into `writer` once started.
    pub fn new(writer: W, opts: GifSinkOpts) -> Self {
        Self {
            opts,
            writer: Some(writer),
            encoder: None,
            failure: Arc::new(Mutex::new(None)),
            cfg: None,
            last_idx: None,
            frames_written: 0,
        }
    }

    /// Number of frames accepted so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl<W: Write + Send> FrameSink for GifSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> GifavatarResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(GifavatarError::validation(
                "gif sink width/height must be non-zero",
            ));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(GifavatarError::validation(
                "gif sink width/height must fit in 16 bits",
            ));
        }
        let writer = self
            .writer
            .take()
            .ok_or_else(|| GifavatarError::encode("gif sink already started"))?;

        let writer = LatchedWriter {
            inner: writer,
            failure: Arc::clone(&self.failure),
        };
        let mut encoder = GifEncoder::new_with_speed(writer, self.opts.speed());
        if cfg.repeat_forever {
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| GifavatarError::encode(format!("failed to set gif repeat: {e}")))?;
        }

        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        frame: &FrameRGBA,
        delay_ms: u32,
    ) -> GifavatarResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| GifavatarError::encode("gif sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(GifavatarError::encode(
                "gif sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(GifavatarError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(GifavatarError::encode("gif sink is already finalized"));
        };

        let delay = Delay::from_numer_denom_ms(self.opts.effective_delay_ms(delay_ms), 1);
        let gif_frame = Frame::from_parts(frame.to_image()?, 0, 0, delay);
        encoder
            .encode_frame(gif_frame)
            .map_err(|e| GifavatarError::encode(format!("failed to encode frame {}: {e}", idx.0)))?;

        self.last_idx = Some(idx);
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> GifavatarResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| GifavatarError::encode("gif sink not started"))?;
        if self.frames_written == 0 {
            return Err(GifavatarError::encode("gif sink finalized without frames"));
        }
        // Dropping the encoder writes the GIF trailer.
        drop(encoder);
        self.cfg = None;
        let failure = self
            .failure
            .lock()
            .map_err(|_| GifavatarError::encode("gif writer state poisoned"))?
            .take();
        if let Some(e) = failure {
            return Err(GifavatarError::encode(format!("failed to finalize gif: {e}")));
        }
        tracing::debug!(frames = self.frames_written, "gif finalized");
        Ok(())
    }

    fn stored_delay_ms(&self, requested_ms: u32) -> u32 {
        self.opts.effective_delay_ms(requested_ms)
    }
}

/// A finalized looping animation plus the numbers actually used to build it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedAnimation {
    /// Complete GIF bytes.
    pub bytes: Vec<u8>,
    /// Number of frames in the animation.
    pub frame_count: u64,
    /// Delay of every frame in milliseconds, as stored in the file.
    pub frame_delay_ms: u32,
}

/// Encode already rendered frames into a looping GIF held in memory.
pub fn encode_gif(
    frames: &[FrameRGBA],
    frame_delay_ms: u32,
    opts: GifSinkOpts,
) -> GifavatarResult<EncodedAnimation> {
    let first = frames
        .first()
        .ok_or_else(|| GifavatarError::validation("cannot encode an empty frame sequence"))?;
    let mut bytes = Vec::new();
    {
        let mut sink = GifSink::new(&mut bytes, opts);
        sink.begin(SinkConfig {
            width: first.width,
            height: first.height,
            repeat_forever: true,
        })?;
        for (i, frame) in frames.iter().enumerate() {
            sink.push_frame(FrameIndex(i as u64), frame, frame_delay_ms)?;
        }
        sink.end()?;
    }
    Ok(EncodedAnimation {
        bytes,
        frame_count: frames.len() as u64,
        frame_delay_ms: opts.effective_delay_ms(frame_delay_ms),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
