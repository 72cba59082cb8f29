// Drives the frame loop end to end against an in-memory target
use glam::{Vec2, Vec3};
use wavefront::coords::{map_to_ndc, Viewport};
use wavefront::frame::{FrameDriver, FrameState, FrameTarget};
use wavefront::params::{GridWave, RingWave, WaveMode, WaveParameters};
use wavefront::rendering::{quad_indices, BufferError, BufferLayout, DrawCall};
use wavefront::wave::{sample_grid, WaveField};

struct MemoryTarget {
    viewport: Viewport,
    layout: BufferLayout,
    contents: Vec<f32>,
    draws: usize,
    released: bool,
}

impl MemoryTarget {
    fn new(field: &WaveField, viewport: Viewport) -> Self {
        Self {
            viewport,
            layout: BufferLayout::new(field.vertex_count(), field.topology()),
            contents: Vec::new(),
            draws: 0,
            released: false,
        }
    }

    fn vertex(&self, i: usize) -> [f32; 3] {
        [
            self.contents[i * 3],
            self.contents[i * 3 + 1],
            self.contents[i * 3 + 2],
        ]
    }
}

impl FrameTarget for MemoryTarget {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn upload(&mut self, vertices: &[f32]) -> Result<(), BufferError> {
        self.layout.check(vertices)?;
        self.contents.clear();
        self.contents.extend_from_slice(vertices);
        Ok(())
    }

    fn render(&mut self, _draw: DrawCall) {
        self.draws += 1;
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Distance in pixels between the first ring vertex and the center
fn first_vertex_radius(target: &MemoryTarget, center: Vec2) -> f32 {
    let [x, y, _] = target.vertex(0);
    let world = Vec2::new(
        (x + 1.0) / 2.0 * target.viewport.width as f32,
        (y + 1.0) / 2.0 * target.viewport.height as f32,
    );
    world.distance(center)
}

#[test]
fn test_ring_grows_across_frames() {
    let center = Vec2::new(800.0, 450.0);
    let field = WaveField::new(WaveMode::Ring(RingWave {
        center,
        wave_speed: 100.0,
        point_count: 64,
    }))
    .unwrap();
    let mut target = MemoryTarget::new(&field, Viewport::new(1600, 900));
    let mut driver = FrameDriver::new(field);

    let mut last = -1.0;
    for step in 0..10 {
        let t = step as f32 * 0.2;
        assert_eq!(driver.frame_at(t, &mut target), FrameState::Running);

        let radius = first_vertex_radius(&target, center);
        assert!((radius - t * 100.0).abs() < 0.05, "t={t} radius={radius}");
        assert!(radius >= last);
        last = radius;
    }
    assert_eq!(target.draws, 10);
}

#[test]
fn test_grid_buffer_size_is_constant() {
    let grid = GridWave {
        params: WaveParameters::new(50.0, 1.0, 200.0),
        ..Default::default()
    };
    let field = WaveField::new(WaveMode::Grid(grid)).unwrap();
    let expected = field.vertex_count() * 3;
    let mut target = MemoryTarget::new(&field, Viewport::new(1600, 900));
    let mut driver = FrameDriver::new(field);

    for step in 0..5 {
        driver.frame_at(step as f32 * 0.1, &mut target);
        assert_eq!(target.contents.len(), expected);
    }
}

/// Twice the screen-space area of a triangle
fn doubled_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
}

#[test]
fn test_grid_triangles_cover_screen_area() {
    let grid = GridWave::default();
    let viewport = Viewport::new(1600, 900);
    let vertices: Vec<Vec3> = sample_grid(&grid, 0.37)
        .into_iter()
        .flatten()
        .map(|p| map_to_ndc(p, viewport))
        .collect();
    let indices = quad_indices((vertices.len() / 4) as u32);

    let triangles = indices.len() / 3;
    let degenerate = indices
        .chunks(3)
        .filter(|tri| {
            let [a, b, c] = [0, 1, 2].map(|k| vertices[tri[k] as usize]);
            doubled_area(a, b, c) == 0.0
        })
        .count();

    assert_eq!(triangles, grid.cell_count() * 2);
    // Only cells sitting exactly on a crest or trough may flatten out
    assert!(
        degenerate * 100 < triangles,
        "{degenerate} of {triangles} triangles have no area"
    );
}

#[test]
fn test_close_then_exit() {
    let field = WaveField::new(WaveMode::default()).unwrap();
    let mut target = MemoryTarget::new(&field, Viewport::new(1600, 900));
    let mut driver = FrameDriver::new(field);

    driver.frame_at(0.1, &mut target);
    driver.request_close();
    assert_eq!(driver.frame_at(0.2, &mut target), FrameState::Finished);

    assert!(target.released);
    assert_eq!(target.draws, 1);
}
