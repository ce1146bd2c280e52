use crate::foundation::error::{GifavatarError, GifavatarResult};

/// Named parametric motion curve selected by the user.
///
/// A pure lookup key: the curve itself lives in [`crate::sample`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionStyle {
    /// Entrance from below with an overshoot settle and a small decaying wiggle.
    #[default]
    Rise,
    /// Horizontal entrance from one frame-width away; the caller picks the side.
    Pan,
    /// Continuous two-axis sinusoidal float.
    Drift,
    /// Small continuous vertical bob.
    Baseline,
    /// Hard overshoot drop from above.
    Stomp,
    /// Scale pulse, no translation.
    Pop,
    /// Opacity ramp over the first third of the body.
    Fade,
    /// Drop from above that bounces on landing.
    Bounce,
    /// Periodic rotation wiggle.
    Wiggle,
    /// One full turn with ease-out.
    Spin,
    /// Scale-in from small with overshoot and a quick fade-in.
    Zoom,
    /// Decaying pendulum rotation.
    Swing,
    /// Decaying horizontal shake.
    Shake,
    /// Drop from above with a squash at landing.
    Drop,
    /// Slow vertical bob with a gentle sway.
    Float,
}

impl MotionStyle {
    /// Every style, in declaration order.
    pub const ALL: [MotionStyle; 15] = [
        Self::Rise,
        Self::Pan,
        Self::Drift,
        Self::Baseline,
        Self::Stomp,
        Self::Pop,
        Self::Fade,
        Self::Bounce,
        Self::Wiggle,
        Self::Spin,
        Self::Zoom,
        Self::Swing,
        Self::Shake,
        Self::Drop,
        Self::Float,
    ];

    /// Lowercase name used in job files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rise => "rise",
            Self::Pan => "pan",
            Self::Drift => "drift",
            Self::Baseline => "baseline",
            Self::Stomp => "stomp",
            Self::Pop => "pop",
            Self::Fade => "fade",
            Self::Bounce => "bounce",
            Self::Wiggle => "wiggle",
            Self::Spin => "spin",
            Self::Zoom => "zoom",
            Self::Swing => "swing",
            Self::Shake => "shake",
            Self::Drop => "drop",
            Self::Float => "float",
        }
    }

    /// Parse a style name, failing on unknown names.
    pub fn parse_strict(name: &str) -> GifavatarResult<Self> {
        let needle = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| GifavatarError::unsupported_style(format!("\"{needle}\"")))
    }

    /// Parse a style name, falling back to [`MotionStyle::Rise`] for unknown names.
    pub fn from_name(name: &str) -> Self {
        match Self::parse_strict(name) {
            Ok(style) => style,
            Err(err) => {
                tracing::warn!(%err, "falling back to rise");
                Self::Rise
            }
        }
    }
}

impl std::fmt::Display for MotionStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> serde::Deserialize<'de> for MotionStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_name(&s))
    }
}

/// Side a [`MotionStyle::Pan`] entrance comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanDirection {
    /// Enter from the left edge.
    FromLeft,
    /// Enter from the right edge.
    FromRight,
}

impl PanDirection {
    /// Pick the entrance side from a horizontal position hint (percent of half-frame).
    ///
    /// Sprites placed right of center enter from the right, everything else from the left.
    pub fn from_position_hint(position_x: f64) -> Self {
        if position_x > 0.0 {
            Self::FromRight
        } else {
            Self::FromLeft
        }
    }

    /// Sign applied to the sampler's (always positive) pan offset.
    pub fn sign(self) -> f64 {
        match self {
            Self::FromLeft => -1.0,
            Self::FromRight => 1.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/style.rs"]
mod tests;
