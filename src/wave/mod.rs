//! Time-parameterized wave sampling.
//!
//! Pure geometry: nothing in here touches the GPU. Each frame the driver asks
//! the active [`WaveField`] for world-space positions at the current time.

mod grid;
mod physics;
mod ring;

use glam::Vec3;

pub use grid::{corner_height, sample_grid, Quad};
pub use ring::{ring_radius, sample_ring};

use crate::params::{GridWave, RingWave, WaveMode};

/// Errors raised while validating wave parameters
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    #[error("Ring needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    #[error("Wave speed must be positive, got {0}")]
    InvalidSpeed(f32),
    #[error("Frequency must be positive, got {0}")]
    InvalidFrequency(f32),
    #[error("Wavelength must be positive, got {0}")]
    InvalidWavelength(f32),
    #[error("Grid step must be positive, got {0}")]
    InvalidStep(f32),
    #[error("Grid bounds ({max_x} x {max_z}) contain no cells")]
    EmptyGrid { max_x: f32, max_z: f32 },
    #[error("Grid of {0} cells exceeds the 32-bit index range")]
    GridTooLarge(usize),
    #[error("Wave parameters must be finite")]
    NonFinite,
}

/// How consecutive samples are connected when drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Closed polyline, last vertex joins the first
    LineLoop,
    /// Quads of four corners, two triangles each
    Quads,
}

/// The wave strategy driving the frame loop
#[derive(Debug, Clone)]
pub enum WaveField {
    RingExpansion(RingWave),
    HeightFieldGrid(GridWave),
}

impl WaveField {
    /// Validate `mode` and build the matching field
    pub fn new(mode: WaveMode) -> Result<Self, WaveError> {
        mode.validate()?;
        Ok(match mode {
            WaveMode::Ring(ring) => Self::RingExpansion(ring),
            WaveMode::Grid(grid) => Self::HeightFieldGrid(grid),
        })
    }

    /// Vertices produced per frame; constant for the field's lifetime
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::RingExpansion(ring) => ring.point_count,
            Self::HeightFieldGrid(grid) => grid.cell_count() * 4,
        }
    }

    pub fn topology(&self) -> Topology {
        match self {
            Self::RingExpansion(_) => Topology::LineLoop,
            Self::HeightFieldGrid(_) => Topology::Quads,
        }
    }

    /// Sample world positions at `elapsed_s`, replacing the contents of `out`
    pub fn sample_into(&self, elapsed_s: f32, out: &mut Vec<Vec3>) {
        out.clear();
        match self {
            Self::RingExpansion(ring) => out.extend(sample_ring(
                ring.center,
                elapsed_s,
                ring.wave_speed,
                ring.point_count,
            )),
            Self::HeightFieldGrid(grid) => {
                out.extend(sample_grid(grid, elapsed_s).into_iter().flatten())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_rejects_invalid_mode() {
        let mode = WaveMode::Ring(RingWave {
            point_count: 1,
            ..Default::default()
        });
        assert!(WaveField::new(mode).is_err());
    }

    #[test]
    fn test_sample_count_matches_vertex_count() {
        let mut out = Vec::new();
        for mode in [
            WaveMode::Ring(RingWave::default()),
            WaveMode::Grid(GridWave::default()),
        ] {
            let field = WaveField::new(mode).unwrap();
            for t in [0.0, 0.5, 3.0] {
                field.sample_into(t, &mut out);
                assert_eq!(out.len(), field.vertex_count());
            }
        }
    }

    #[test]
    fn test_topology_per_mode() {
        let ring = WaveField::new(WaveMode::Ring(RingWave::default())).unwrap();
        let grid = WaveField::new(WaveMode::Grid(GridWave::default())).unwrap();
        assert_eq!(ring.topology(), Topology::LineLoop);
        assert_eq!(grid.topology(), Topology::Quads);
    }
}
