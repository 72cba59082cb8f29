//! Parameter definitions with units and documented semantics.
//!
//! All tunable numbers live here:
//! - Units (pixels, seconds, Hz)
//! - Defaults matching the reference visualization
//! - Validation before anything touches the GPU

mod render;
mod wave;

// Re-export all types
pub use render::RenderConfig;
pub use wave::{
    GridWave, HeightProfile, RingWave, WaveMode, WaveParameters, MIN_RING_POINTS,
};
