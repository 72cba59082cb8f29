//! Sinusoidal height-field sampled on a regular grid.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::params::{GridWave, HeightProfile};

/// Four corners of one grid cell: (x,z), (x+dx,z), (x+dx,z+dz), (x,z+dz)
pub type Quad = [Vec3; 4];

/// Height at world X for time `t`
///
/// The phase depends on X and time only; Z never enters it. The floor, when
/// configured, is applied after the profile is evaluated.
pub fn corner_height(grid: &GridWave, world_x: f32, t: f32) -> f32 {
    let p = &grid.params;
    let y = match grid.profile {
        HeightProfile::Reference => {
            p.amplitude * (TAU * p.frequency * (world_x + t) / p.wavelength).sin()
        }
        HeightProfile::Travelling => p.displacement(world_x, 0.0, 0.0, t),
    };

    match grid.height_floor {
        Some(floor) => y.max(floor),
        None => y,
    }
}

/// Sample every cell of the grid at time `t`
///
/// X is the outer loop and Z the inner one, both ascending. The far-row
/// corners take their phase at `x + dz` and `x + dx + dz`, which gives each
/// cell a visible slope in screen space. Cells sharing an X edge meet
/// exactly; cells sharing a Z edge do not.
pub fn sample_grid(grid: &GridWave, t: f32) -> Vec<Quad> {
    let (dx, dz) = (grid.step_x, grid.step_z);
    let origin = grid.params.origin;
    let mut quads = Vec::with_capacity(grid.cell_count());

    for col in 0..grid.columns() {
        let (x0, x1) = (col as f32 * dx, (col + 1) as f32 * dx);
        // Z never enters the phase, so the four heights are shared by the column
        let heights = [
            corner_height(grid, x0, t),
            corner_height(grid, x1, t),
            corner_height(grid, x1 + dz, t),
            corner_height(grid, x0 + dz, t),
        ];

        for row in 0..grid.rows() {
            let (z0, z1) = (row as f32 * dz, (row + 1) as f32 * dz);
            quads.push([
                origin + Vec3::new(x0, heights[0], z0),
                origin + Vec3::new(x1, heights[1], z0),
                origin + Vec3::new(x1, heights[2], z1),
                origin + Vec3::new(x0, heights[3], z1),
            ]);
        }
    }

    quads
}
