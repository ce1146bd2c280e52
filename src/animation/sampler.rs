//! Motion sampler: `(style, elapsed seconds) -> Transform`.
//!
//! Sampling is a pure function of its inputs. There is no seed and no internal state, so a frame
//! can be recomputed at any time and property tests can probe arbitrary instants.

use std::f64::consts::{PI, TAU};

use crate::animation::ease::Ease;
use crate::animation::style::MotionStyle;
use crate::foundation::core::{TimingConfig, Transform};

/// Timing and geometry the sampler needs besides the style and the instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleCtx {
    /// Length of one cycle in seconds (lead-in included).
    pub total_duration_secs: f64,
    /// Frozen lead-in in seconds.
    pub still_lead_secs: f64,
    /// Edge length of the (square) output frame in pixels.
    pub frame_px: f64,
}

impl SampleCtx {
    /// Build a context from a job's timing and its output edge length.
    pub fn new(timing: &TimingConfig, frame_px: u32) -> Self {
        Self {
            total_duration_secs: timing.total_duration_secs,
            still_lead_secs: timing.still_lead_secs,
            frame_px: f64::from(frame_px),
        }
    }

    /// Length of the animated body in seconds, never below one microsecond.
    pub fn body_secs(&self) -> f64 {
        (self.total_duration_secs - self.still_lead_secs).max(1e-6)
    }
}

/// Sample `style` at `t` seconds into the cycle.
///
/// Inside the lead-in (`t <= still_lead_secs`) the identity transform is returned. Afterwards the
/// time is rebased to the start of the animated body and the style's curve is evaluated.
pub fn sample(style: MotionStyle, t: f64, ctx: &SampleCtx) -> Transform {
    if !t.is_finite() || t <= ctx.still_lead_secs {
        return Transform::IDENTITY;
    }
    let mt = t - ctx.still_lead_secs;
    let p = (mt / ctx.body_secs()).clamp(0.0, 1.0);
    sample_body(style, mt, p, ctx)
}

/// Evaluate a style's curve at body time `mt` and body progress `p` in `[0, 1]`.
///
/// Entrance styles use `p` and come to rest at `p = 1`; ambient styles are periodic in `mt`.
pub fn sample_body(style: MotionStyle, mt: f64, p: f64, ctx: &SampleCtx) -> Transform {
    let h = ctx.frame_px;
    let rest = 1.0 - p;
    let mut out = Transform::IDENTITY;
    match style {
        MotionStyle::Rise => {
            out.y = h * (1.0 - Ease::OutBack.apply(p));
            out.x = 0.015 * h * (TAU * 2.0 * mt).sin() * rest * rest;
            out.rotate_deg = 4.0 * (TAU * 1.5 * mt).sin() * rest * rest;
        }
        MotionStyle::Pan => {
            out.x = h * (1.0 - Ease::OutCubic.apply(p));
        }
        MotionStyle::Drift => {
            out.x = 0.03 * h * (TAU * 0.4 * mt).sin();
            out.y = 0.02 * h * (TAU * 0.65 * mt).sin();
        }
        MotionStyle::Baseline => {
            out.y = 0.015 * h * (TAU * 0.8 * mt).sin();
        }
        MotionStyle::Stomp => {
            out.y = -0.6 * h * (1.0 - Ease::OutBack.apply(p));
        }
        MotionStyle::Pop => {
            let phase = (mt * 1.25).fract();
            out.scale = 0.95 + 0.13 * (PI * phase).sin();
        }
        MotionStyle::Fade => {
            let window = ctx.body_secs() / 3.0;
            let ramp = (mt / window).clamp(0.0, 1.0);
            out.opacity = 0.2 + 0.8 * ramp;
        }
        MotionStyle::Bounce => {
            out.y = -h * (1.0 - Ease::OutBounce.apply(p));
        }
        MotionStyle::Wiggle => {
            out.rotate_deg = 6.0 * (TAU * 2.0 * mt).sin();
        }
        MotionStyle::Spin => {
            out.rotate_deg = -360.0 * (1.0 - Ease::OutCubic.apply(p));
        }
        MotionStyle::Zoom => {
            out.scale = 0.3 + 0.7 * Ease::OutBack.apply(p);
            out.opacity = (p / 0.2).clamp(0.0, 1.0);
        }
        MotionStyle::Swing => {
            out.rotate_deg = 15.0 * (TAU * 1.2 * mt).cos() * rest * rest;
        }
        MotionStyle::Shake => {
            out.x = 0.04 * h * (TAU * 6.0 * mt).sin() * rest;
        }
        MotionStyle::Drop => {
            out.y = -h * (1.0 - Ease::OutCubic.apply(p));
            let squash = ((p - 0.55) / 0.25).clamp(0.0, 1.0);
            out.scale = 1.0 - 0.06 * (PI * squash).sin();
        }
        MotionStyle::Float => {
            out.y = 0.025 * h * (TAU * 0.35 * mt).sin();
            out.rotate_deg = 2.0 * (TAU * 0.25 * mt).sin();
        }
    }
    out
}

/// Maps wall-clock seconds since a live display started into sampler time.
///
/// Each loop replays `total_duration_secs` of sampler time starting at `start_secs` and then
/// holds the final pose for `pause_secs` before re-entering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopClock {
    /// Sampler time at the start of every cycle; non-zero skips the lead-in.
    pub start_secs: f64,
    /// Length of one cycle in seconds.
    pub total_duration_secs: f64,
    /// Hold at the end of each cycle, in seconds.
    pub pause_secs: f64,
}

impl LoopClock {
    /// Build a loop clock for `timing` with an end-of-cycle hold.
    pub fn new(timing: &TimingConfig, pause_secs: f64) -> Self {
        Self {
            start_secs: 0.0,
            total_duration_secs: timing.total_duration_secs,
            pause_secs: pause_secs.max(0.0),
        }
    }

    /// Start every cycle after the lead-in, the way frames are sampled when the still
    /// lead-in is disabled.
    pub fn skipping_lead(self, timing: &TimingConfig) -> Self {
        Self {
            start_secs: timing.still_lead_secs.max(0.0),
            ..self
        }
    }

    /// Sampler time for `elapsed_secs` of wall-clock time.
    pub fn sampler_time(&self, elapsed_secs: f64) -> f64 {
        if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return self.start_secs;
        }
        let cycle = self.total_duration_secs + self.pause_secs;
        if cycle <= 0.0 {
            return self.start_secs;
        }
        self.start_secs + (elapsed_secs % cycle).min(self.total_duration_secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sampler.rs"]
mod tests;
