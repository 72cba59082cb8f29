//! Expanding circular wavefront.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Radius after `elapsed_s` seconds; never reset, so it grows without bound
pub fn ring_radius(elapsed_s: f32, wave_speed: f32) -> f32 {
    elapsed_s * wave_speed
}

/// Sample `point_count` evenly spaced points on the wavefront
///
/// Points are ordered by ascending angle starting at angle 0 (positive X) and
/// lie in the z = 0 plane. At `elapsed_s == 0` every point sits on `center`.
pub fn sample_ring(center: Vec2, elapsed_s: f32, wave_speed: f32, point_count: usize) -> Vec<Vec3> {
    let radius = ring_radius(elapsed_s, wave_speed);

    (0..point_count)
        .map(|i| {
            let angle = TAU * i as f32 / point_count as f32;
            Vec3::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
                0.0,
            )
        })
        .collect()
}
