//! Encoder Adapter: frame sinks that turn raster frames into one looping animation.
//!
//! Sinks consume frames in strictly increasing index order with a per-frame delay.

/// Looping GIF sink backed by the `image` crate's GIF codec.
pub mod gif;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
