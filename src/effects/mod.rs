//! Raster effects applied to the cutout before compositing.

/// Uniform outline around opaque content.
pub mod stroke;
