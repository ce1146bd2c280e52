//! Live-Capture Frame Backend.
//!
//! Frames are rasterized from a surface that keeps animating on its own clock and are captured
//! strictly one after another, with a wall-clock wait between captures.

/// Capture loop and the live surface contract.
pub mod live;
/// Live surface driven directly by the motion sampler.
pub mod sampled;
