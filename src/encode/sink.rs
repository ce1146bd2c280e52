use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Loop the animation forever.
    pub repeat_forever: bool,
}

/// Encoder Adapter contract: incremental frame addition with a per-frame delay.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> GifavatarResult<()>;
    /// Push one frame shown for `delay_ms` milliseconds.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA, delay_ms: u32)
    -> GifavatarResult<()>;
    /// Called once after the last frame is pushed; finalizes the output.
    fn end(&mut self) -> GifavatarResult<()>;

    /// Delay the output actually stores when `requested_ms` is pushed.
    ///
    /// Containers with a coarser delay unit round here; the default stores delays verbatim.
    fn stored_delay_ms(&self, requested_ms: u32) -> u32 {
        requested_ms
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    finished: bool,
    /// Frames in push order with their delay.
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA, u32)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA, u32)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> GifavatarResult<()> {
        self.cfg = Some(cfg);
        self.finished = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        frame: &FrameRGBA,
        delay_ms: u32,
    ) -> GifavatarResult<()> {
        if self.cfg.is_none() {
            return Err(GifavatarError::encode("in-memory sink not started"));
        }
        if let Some((last, _, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(GifavatarError::encode(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone(), delay_ms));
        Ok(())
    }

    fn end(&mut self) -> GifavatarResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
