//! Render jobs: JSON configuration and the end-to-end decode, render, encode pipeline.

/// Render job configuration.
pub mod config;
/// End-to-end entry points.
pub mod pipeline;
