//! Wavefront library - real-time wave propagation visualization

pub mod cli;
pub mod coords;
pub mod frame;
pub mod params;
pub mod rendering;
pub mod wave;
