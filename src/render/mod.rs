//! Sprite preparation, compositing and the deterministic frame backend.

/// Affine sprite compositing onto a frame.
pub mod composite;
/// Rendered frame container.
pub mod frame;
/// Deterministic frame synthesis (lead-in plus animated body).
pub mod pipeline;
/// Cutout sizing and outline into a reusable sprite.
pub mod sprite;
