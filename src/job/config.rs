use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::animation::style::MotionStyle;
use crate::capture::live::CaptureOpts;
use crate::capture::sampled::DEFAULT_LOOP_PAUSE_SECS;
use crate::effects::stroke::StrokeConfig;
use crate::encode::gif::{DEFAULT_GIF_QUALITY, GifSinkOpts};
use crate::foundation::core::{Rgb8, TimingConfig};
use crate::foundation::error::{GifavatarError, GifavatarResult};
use crate::render::pipeline::{AvatarScene, RenderThreading};
use crate::render::sprite::{Sprite, TransformConfig};

/// Settings used only by the live-capture path.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Pixel density of captured frames.
    pub scale: f64,
    /// Hold at the end of each loop before the surface restarts, in seconds.
    pub loop_pause_secs: f64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            loop_pause_secs: DEFAULT_LOOP_PAUSE_SECS,
        }
    }
}

/// One avatar render request, as read from JSON.
///
/// Every field is optional in JSON and falls back to its default:
///
/// ```json
/// {
///   "style": "fade",
///   "timing": { "fps": 12, "total_duration_secs": 5.5, "still_lead_secs": 0.5 },
///   "transform": { "position_x": 0, "position_y": 10, "zoom": 0.9, "output_size": 400 },
///   "stroke": { "enabled": true, "weight_px": 6, "color": "#000000" },
///   "background": "#f4f1ea"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderJob {
    /// Motion curve; unknown names fall back to `rise`.
    pub style: MotionStyle,
    /// Frame rate and cycle length.
    pub timing: TimingConfig,
    /// Static placement and output size.
    pub transform: TransformConfig,
    /// Outline around the cutout.
    pub stroke: StrokeConfig,
    /// Solid background of deterministic frames.
    pub background: Rgb8,
    /// Serial or parallel frame synthesis.
    pub threading: RenderThreading,
    /// GIF palette quality, `1` (best) to `30` (fastest).
    pub quality: u8,
    /// Live-capture settings.
    pub live: LiveConfig,
}

impl Default for RenderJob {
    fn default() -> Self {
        Self {
            style: MotionStyle::default(),
            timing: TimingConfig::default(),
            transform: TransformConfig::default(),
            stroke: StrokeConfig::default(),
            background: Rgb8::WHITE,
            threading: RenderThreading::default(),
            quality: DEFAULT_GIF_QUALITY,
            live: LiveConfig::default(),
        }
    }
}

impl RenderJob {
    /// Parse a job from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> GifavatarResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| GifavatarError::serde(format!("parse render job JSON: {e}")))
    }

    /// Parse a job from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> GifavatarResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GifavatarError::validation(format!("open render job JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize the job as pretty JSON.
    pub fn to_json_pretty(&self) -> GifavatarResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GifavatarError::serde(format!("serialize render job JSON: {e}")))
    }

    /// Check every setting before any pixel work starts.
    pub fn validate(&self) -> GifavatarResult<()> {
        self.timing.validate()?;
        self.transform.validate()?;
        self.stroke.validate()?;
        if !(1..=30).contains(&self.quality) {
            return Err(GifavatarError::validation("quality must be in 1..=30"));
        }
        if let Some(0) = self.threading.threads {
            return Err(GifavatarError::validation(
                "threading.threads must be >= 1 when set",
            ));
        }
        if !self.live.scale.is_finite() || self.live.scale <= 0.0 || self.live.scale > 4.0 {
            return Err(GifavatarError::validation("live.scale must be in (0, 4]"));
        }
        if !self.live.loop_pause_secs.is_finite() || self.live.loop_pause_secs < 0.0 {
            return Err(GifavatarError::validation(
                "live.loop_pause_secs must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Deterministic scene for a sprite prepared from this job.
    pub fn scene<'a>(&self, sprite: &'a Sprite) -> AvatarScene<'a> {
        AvatarScene {
            sprite,
            style: self.style,
            timing: self.timing,
            transform: self.transform,
            background: self.background,
        }
    }

    /// Encoder options for this job.
    pub fn gif_opts(&self) -> GifSinkOpts {
        GifSinkOpts {
            quality: self.quality,
        }
    }

    /// Live-capture options covering one full cycle.
    pub fn capture_opts(&self) -> CaptureOpts {
        CaptureOpts {
            scale: self.live.scale,
            ..CaptureOpts::from_timing(&self.timing, self.quality)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/config.rs"]
mod tests;
