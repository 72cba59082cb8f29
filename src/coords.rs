//! World-space to normalized device coordinate mapping.

use glam::Vec3;

/// Drawable area in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True while the window has no drawable area (e.g. minimized)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Map one world coordinate onto [-1, 1] across `dimension`
pub fn to_ndc(world: f32, dimension: f32) -> f32 {
    (world / dimension) * 2.0 - 1.0
}

/// Map X by width and Y by height; Z passes through (orthographic)
pub fn map_to_ndc(position: Vec3, viewport: Viewport) -> Vec3 {
    Vec3::new(
        to_ndc(position.x, viewport.width as f32),
        to_ndc(position.y, viewport.height as f32),
        position.z,
    )
}
