//! Travelling-wave physics: wave number, angular frequency, displacement.

use std::f32::consts::TAU;

use crate::params::WaveParameters;

impl WaveParameters {
    /// Wave number `k = 2π / λ` (radians per world unit)
    pub fn wave_number(&self) -> f32 {
        TAU / self.wavelength
    }

    /// Angular frequency `ω = 2π f` (radians per second)
    pub fn angular_frequency(&self) -> f32 {
        TAU * self.frequency
    }

    /// Displacement `A sin(k x - ω t)` for a wave propagating along X
    ///
    /// `y` and `z` are accepted so callers can pass full positions; they do not
    /// affect the result.
    pub fn displacement(&self, x: f32, _y: f32, _z: f32, t: f32) -> f32 {
        self.amplitude * (self.wave_number() * x - self.angular_frequency() * t).sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wave_number_and_angular_frequency() {
        let wave = WaveParameters::new(1.0, 2.0, 4.0);
        assert!((wave.wave_number() - PI / 2.0).abs() < 1e-6);
        assert!((wave.angular_frequency() - 4.0 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_displacement_zero_at_origin() {
        let wave = WaveParameters::from_speed(343.0, 440.0, 0.5);
        assert_eq!(wave.displacement(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_displacement_peak_quarter_wavelength() {
        let wave = WaveParameters::new(3.0, 1.0, 8.0);
        let y = wave.displacement(2.0, 0.0, 0.0, 0.0);
        assert!((y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_crest_moves_at_wave_speed() {
        let wave = WaveParameters::new(1.0, 2.0, 5.0);
        let t = 0.3;
        let shifted = wave.displacement(1.0 + wave.speed() * t, 0.0, 0.0, t);
        let initial = wave.displacement(1.0, 0.0, 0.0, 0.0);
        assert!((shifted - initial).abs() < 1e-4);
    }

    #[test]
    fn test_displacement_independent_of_y_z() {
        let wave = WaveParameters::new(1.0, 1.0, 3.0);
        let a = wave.displacement(0.7, 0.0, 0.0, 0.2);
        let b = wave.displacement(0.7, 12.0, -4.0, 0.2);
        assert_eq!(a, b);
    }
}
