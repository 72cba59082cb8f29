//! Wave parameters for the ring and grid visualizations.

use glam::{Vec2, Vec3};

use crate::wave::WaveError;

/// Minimum number of ring samples that still forms a polygon
pub const MIN_RING_POINTS: usize = 3;

/// Two triangles per grid cell
const INDICES_PER_CELL: usize = 6;

/// Shared description of a sinusoidal wave
///
/// Speed is never stored: it is always `frequency * wavelength`, so the
/// three quantities cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParameters {
    /// Peak displacement (world units, pixels for the default viewport)
    pub amplitude: f32,

    /// Temporal frequency (Hz)
    pub frequency: f32,

    /// Spatial period (world units)
    pub wavelength: f32,

    /// Geometry origin; offsets sampled positions, never the phase
    pub origin: Vec3,
}

impl WaveParameters {
    pub fn new(amplitude: f32, frequency: f32, wavelength: f32) -> Self {
        Self {
            amplitude,
            frequency,
            wavelength,
            origin: Vec3::ZERO,
        }
    }

    /// Build from propagation speed, deriving `wavelength = speed / frequency`
    pub fn from_speed(speed: f32, frequency: f32, amplitude: f32) -> Self {
        Self::new(amplitude, frequency, speed / frequency)
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Propagation speed (world units per second)
    pub fn speed(&self) -> f32 {
        self.frequency * self.wavelength
    }

    pub fn validate(&self) -> Result<(), WaveError> {
        let finite = [self.amplitude, self.frequency, self.wavelength]
            .iter()
            .all(|v| v.is_finite())
            && self.origin.is_finite();
        if !finite {
            return Err(WaveError::NonFinite);
        }
        if self.frequency <= 0.0 {
            return Err(WaveError::InvalidFrequency(self.frequency));
        }
        if self.wavelength <= 0.0 {
            return Err(WaveError::InvalidWavelength(self.wavelength));
        }
        Ok(())
    }
}

/// Expanding circular wavefront from a point source
#[derive(Debug, Clone)]
pub struct RingWave {
    /// Source position in world coordinates (pixels)
    pub center: Vec2,

    /// Radial expansion speed (pixels per second)
    pub wave_speed: f32,

    /// Samples along the circumference
    pub point_count: usize,
}

impl Default for RingWave {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            wave_speed: 100.0,
            point_count: 100,
        }
    }
}

impl RingWave {
    pub fn validate(&self) -> Result<(), WaveError> {
        if self.point_count < MIN_RING_POINTS {
            return Err(WaveError::TooFewPoints(self.point_count));
        }
        if !self.wave_speed.is_finite() || self.wave_speed <= 0.0 {
            return Err(WaveError::InvalidSpeed(self.wave_speed));
        }
        if !self.center.is_finite() {
            return Err(WaveError::NonFinite);
        }
        Ok(())
    }
}

/// Height formula used by the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightProfile {
    /// `A * sin(2π f (x + t) / λ)`
    #[default]
    Reference,

    /// `A * sin(k x - ω t)` with `k = 2π/λ`, `ω = 2π f`
    Travelling,
}

/// Sinusoidal height-field sampled on a regular XZ grid
#[derive(Debug, Clone)]
pub struct GridWave {
    pub params: WaveParameters,

    /// Upper X bound of the grid (exclusive of the last step)
    pub max_x: f32,

    /// Upper Z bound of the grid (exclusive of the last step)
    pub max_z: f32,

    /// Cell width along X
    pub step_x: f32,

    /// Cell depth along Z
    pub step_z: f32,

    pub profile: HeightProfile,

    /// Lower bound applied to heights; `None` leaves them unbounded
    pub height_floor: Option<f32>,
}

impl Default for GridWave {
    fn default() -> Self {
        Self {
            // Centered vertically in a 1600x900 viewport
            params: WaveParameters::new(120.0, 0.5, 400.0).with_origin(Vec3::new(0.0, 450.0, 0.0)),
            max_x: 1600.0,
            max_z: 1.0,
            step_x: 8.0,
            step_z: 0.125,
            profile: HeightProfile::Reference,
            height_floor: None,
        }
    }
}

impl GridWave {
    /// Cells along X
    pub fn columns(&self) -> usize {
        steps_below(self.max_x, self.step_x)
    }

    /// Cells along Z
    pub fn rows(&self) -> usize {
        steps_below(self.max_z, self.step_z)
    }

    pub fn cell_count(&self) -> usize {
        self.columns().saturating_mul(self.rows())
    }

    pub fn validate(&self) -> Result<(), WaveError> {
        self.params.validate()?;
        for step in [self.step_x, self.step_z] {
            if !step.is_finite() || step <= 0.0 {
                return Err(WaveError::InvalidStep(step));
            }
        }
        if !self.max_x.is_finite() || !self.max_z.is_finite() {
            return Err(WaveError::NonFinite);
        }
        let cells = self.cell_count();
        if cells == 0 {
            return Err(WaveError::EmptyGrid {
                max_x: self.max_x,
                max_z: self.max_z,
            });
        }
        // Draw counts and indices are u32
        let indices = cells.checked_mul(INDICES_PER_CELL);
        if indices.map_or(true, |n| u32::try_from(n).is_err()) {
            return Err(WaveError::GridTooLarge(cells));
        }
        Ok(())
    }
}

/// Number of `i >= 0` with `i * step < max - step`
fn steps_below(max: f32, step: f32) -> usize {
    if step <= 0.0 || !step.is_finite() || !max.is_finite() {
        return 0;
    }
    let span = max - step;
    if span <= 0.0 {
        return 0;
    }
    // Saturates for spans far beyond usize
    (span / step).ceil() as usize
}

/// Which visualization the frame loop renders
#[derive(Debug, Clone)]
pub enum WaveMode {
    Ring(RingWave),
    Grid(GridWave),
}

impl Default for WaveMode {
    fn default() -> Self {
        Self::Ring(RingWave::default())
    }
}

impl WaveMode {
    pub fn validate(&self) -> Result<(), WaveError> {
        match self {
            WaveMode::Ring(ring) => ring.validate(),
            WaveMode::Grid(grid) => grid.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_is_frequency_times_wavelength() {
        let params = WaveParameters::from_speed(343.0, 440.0, 1.0);
        assert!((params.speed() - 343.0).abs() < 1e-3);
        assert!((params.wavelength - 343.0 / 440.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let params = WaveParameters::new(1.0, 0.0, 1.0);
        assert!(matches!(
            params.validate(),
            Err(WaveError::InvalidFrequency(_))
        ));

        let params = WaveParameters::new(1.0, 2.0, 0.0);
        assert!(matches!(
            params.validate(),
            Err(WaveError::InvalidWavelength(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let params = WaveParameters::new(f32::NAN, 1.0, 1.0);
        assert!(matches!(params.validate(), Err(WaveError::NonFinite)));
    }

    #[test]
    fn test_ring_needs_three_points() {
        let ring = RingWave {
            point_count: 2,
            ..Default::default()
        };
        assert!(matches!(ring.validate(), Err(WaveError::TooFewPoints(2))));

        let ring = RingWave {
            point_count: 3,
            ..Default::default()
        };
        assert!(ring.validate().is_ok());
    }

    #[test]
    fn test_grid_cell_counts() {
        let grid = GridWave {
            max_x: 10.0,
            max_z: 4.0,
            step_x: 1.0,
            step_z: 1.0,
            ..Default::default()
        };
        // x in {0..8}, z in {0, 1, 2}
        assert_eq!(grid.columns(), 9);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cell_count(), 27);
    }

    #[test]
    fn test_grid_cell_counts_fractional_span() {
        let grid = GridWave {
            max_x: 10.5,
            max_z: 1.0,
            step_x: 2.0,
            step_z: 0.125,
            ..Default::default()
        };
        // x in {0, 2, 4, 6, 8} (< 8.5), z in {0, .., 0.75} (< 0.875)
        assert_eq!(grid.columns(), 5);
        assert_eq!(grid.rows(), 7);
        assert_eq!(GridWave::default().cell_count(), 199 * 7);
    }

    #[test]
    fn test_grid_rejects_index_overflow() {
        let grid = GridWave {
            max_x: 1.0e9,
            max_z: 1.0e9,
            step_x: 1.0,
            step_z: 1.0,
            ..Default::default()
        };
        assert!(matches!(grid.validate(), Err(WaveError::GridTooLarge(_))));

        let grid = GridWave {
            max_x: f32::MAX,
            step_x: 1.0e-30,
            ..Default::default()
        };
        assert!(matches!(grid.validate(), Err(WaveError::GridTooLarge(_))));
    }

    #[test]
    fn test_grid_rejects_bad_step() {
        let grid = GridWave {
            step_x: 0.0,
            ..Default::default()
        };
        assert!(matches!(grid.validate(), Err(WaveError::InvalidStep(_))));
    }

    #[test]
    fn test_grid_rejects_empty() {
        let grid = GridWave {
            max_x: 1.0,
            step_x: 1.0,
            ..Default::default()
        };
        assert!(matches!(grid.validate(), Err(WaveError::EmptyGrid { .. })));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(WaveMode::default().validate().is_ok());
        assert!(WaveMode::Grid(GridWave::default()).validate().is_ok());
    }
}
