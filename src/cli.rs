//! Command-line argument parsing.
//!
//! Every flag is optional: running with no arguments reproduces the default
//! expanding-ring visualization.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glam::Vec2;

use crate::params::{GridWave, HeightProfile, RenderConfig, RingWave, WaveMode, WaveParameters};

/// Visualization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Expanding circular wavefront
    Ring,
    /// Sinusoidal height-field
    Grid,
}

/// Grid height formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Reference,
    Travelling,
}

impl From<ProfileArg> for HeightProfile {
    fn from(profile: ProfileArg) -> Self {
        match profile {
            ProfileArg::Reference => HeightProfile::Reference,
            ProfileArg::Travelling => HeightProfile::Travelling,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavefront")]
#[command(about = "Real-time wave propagation visualizer", long_about = None)]
pub struct Args {
    /// Visualization mode
    #[arg(long, value_enum, default_value = "ring")]
    pub mode: ModeArg,

    /// Ring samples along the circumference
    #[arg(long, value_name = "COUNT")]
    pub points: Option<usize>,

    /// Ring expansion speed (pixels per second)
    #[arg(long, value_name = "PX_PER_S")]
    pub speed: Option<f32>,

    /// Ring source position (pixels)
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    pub center: Option<Vec<f32>>,

    /// Grid wave amplitude (pixels)
    #[arg(long)]
    pub amplitude: Option<f32>,

    /// Grid wave frequency (Hz)
    #[arg(long)]
    pub frequency: Option<f32>,

    /// Grid wavelength (pixels)
    #[arg(long)]
    pub wavelength: Option<f32>,

    /// Grid height formula
    #[arg(long, value_enum, default_value = "reference")]
    pub profile: ProfileArg,

    /// Clamp grid heights to this floor (unclamped when omitted)
    #[arg(long, value_name = "HEIGHT", allow_negative_numbers = true)]
    pub height_floor: Option<f32>,

    /// Directory holding vertex.wgsl and fragment.wgsl
    #[arg(long, value_name = "DIR")]
    pub shader_dir: Option<PathBuf>,

    /// Window width (logical pixels)
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height (logical pixels)
    #[arg(long)]
    pub height: Option<u32>,
}

impl Args {
    /// Build the wave mode from the defaults plus any overrides
    pub fn wave_mode(&self) -> WaveMode {
        match self.mode {
            ModeArg::Ring => {
                let mut ring = RingWave::default();
                if let Some(points) = self.points {
                    ring.point_count = points;
                }
                if let Some(speed) = self.speed {
                    ring.wave_speed = speed;
                }
                if let Some(&[x, y]) = self.center.as_deref() {
                    ring.center = Vec2::new(x, y);
                }
                WaveMode::Ring(ring)
            }
            ModeArg::Grid => {
                let mut grid = GridWave::default();
                let p = grid.params;
                grid.params = WaveParameters::new(
                    self.amplitude.unwrap_or(p.amplitude),
                    self.frequency.unwrap_or(p.frequency),
                    self.wavelength.unwrap_or(p.wavelength),
                )
                .with_origin(p.origin);
                grid.profile = self.profile.into();
                grid.height_floor = self.height_floor;
                WaveMode::Grid(grid)
            }
        }
    }

    /// Build the render configuration from the defaults plus any overrides
    pub fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::default();
        if let Some(dir) = &self.shader_dir {
            config = config.with_shader_dir(dir);
        }
        if let Some(width) = self.width {
            config.window_width = width;
        }
        if let Some(height) = self.height {
            config.window_height = height;
        }
        config
    }
}
