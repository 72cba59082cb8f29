//! Fixed-capacity vertex buffer streamed every frame.

use wgpu::util::DeviceExt;

use super::with_error_scope;
use crate::wave::Topology;

/// Position-only vertices: x, y, z
pub const FLOATS_PER_VERTEX: usize = 3;

const VERTEX_STRIDE: u64 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;
const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const QUAD_TRIANGLES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Errors raised when streaming vertices
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Upload of {requested} vertices exceeds buffer capacity of {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },
    #[error("Vertex data length {0} is not a multiple of 3 floats")]
    Misaligned(usize),
}

/// Draw over the currently uploaded geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    LineLoop { count: u32 },
    Triangles { offset: u32, count: u32 },
}

impl DrawCall {
    /// Draw covering `vertex_count` vertices of the given topology
    pub fn for_topology(topology: Topology, vertex_count: usize) -> Self {
        match topology {
            Topology::LineLoop => Self::LineLoop {
                count: vertex_count as u32,
            },
            Topology::Quads => Self::Triangles {
                offset: 0,
                count: (vertex_count / 4 * QUAD_TRIANGLES.len()) as u32,
            },
        }
    }
}

/// Capacity arithmetic and upload checks for a [`GeometryBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLayout {
    capacity_vertices: usize,
    topology: Topology,
}

impl BufferLayout {
    pub fn new(capacity_vertices: usize, topology: Topology) -> Self {
        Self {
            capacity_vertices,
            topology,
        }
    }

    /// Allocated vertex buffer size: `capacity * 3 * sizeof(f32)`
    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_vertices as u64 * VERTEX_STRIDE
    }

    /// Validate an upload, returning its vertex count
    ///
    /// Never truncates: anything that does not fit is an error.
    pub fn check(&self, vertices: &[f32]) -> Result<usize, BufferError> {
        if vertices.len() % FLOATS_PER_VERTEX != 0 {
            return Err(BufferError::Misaligned(vertices.len()));
        }
        let requested = vertices.len() / FLOATS_PER_VERTEX;
        if requested > self.capacity_vertices {
            return Err(BufferError::CapacityExceeded {
                requested,
                capacity: self.capacity_vertices,
            });
        }
        Ok(requested)
    }

    /// Initial index data for the topology
    pub fn indices(&self) -> Vec<u32> {
        match self.topology {
            Topology::LineLoop => line_loop_indices(self.capacity_vertices as u32),
            Topology::Quads => quad_indices((self.capacity_vertices / 4) as u32),
        }
    }

    /// wgpu layout matching the interleaved position data
    pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: VERTEX_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// `0, 1, .., count - 1, 0`: a line strip that closes on itself
///
/// wgpu has no line-loop primitive, so the loop is an indexed strip.
pub fn line_loop_indices(count: u32) -> Vec<u32> {
    (0..count).chain(std::iter::once(0)).collect()
}

/// Two triangles (0,1,2) and (2,3,0) per quad of four vertices
pub fn quad_indices(quads: u32) -> Vec<u32> {
    (0..quads)
        .flat_map(|q| QUAD_TRIANGLES.map(|i| q * 4 + i))
        .collect()
}

/// GPU vertex buffer allocated once and overwritten in place
pub struct GeometryBuffer {
    layout: BufferLayout,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    /// Vertex count the loop closing index currently points back from
    loop_len: usize,
}

impl GeometryBuffer {
    /// Allocate buffers for `capacity_vertices` vertices
    pub fn new(device: &wgpu::Device, capacity_vertices: usize, topology: Topology) -> Self {
        let layout = BufferLayout::new(capacity_vertices, topology);

        let (vertex_buffer, index_buffer) = with_error_scope(device, "buffer allocation", || {
            let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Wave Vertex Buffer"),
                size: layout.capacity_bytes(),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Wave Index Buffer"),
                contents: bytemuck::cast_slice(&layout.indices()),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            });

            (vertex_buffer, index_buffer)
        });

        log::debug!(
            "Allocated {} byte vertex buffer ({:?}, {} vertices)",
            layout.capacity_bytes(),
            topology,
            capacity_vertices
        );

        Self {
            layout,
            vertex_buffer,
            index_buffer,
            loop_len: capacity_vertices,
        }
    }

    /// Overwrite the buffer from offset 0 with `vertices` (3 floats each)
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[f32],
    ) -> Result<(), BufferError> {
        let count = self.layout.check(vertices)?;
        if count == 0 {
            return Ok(());
        }

        with_error_scope(device, "vertex upload", || {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));

            if self.layout.topology == Topology::LineLoop && count != self.loop_len {
                queue.write_buffer(
                    &self.index_buffer,
                    0,
                    bytemuck::cast_slice(&line_loop_indices(count as u32)),
                );
            }
        });
        self.loop_len = count;

        Ok(())
    }

    /// Closed polyline over the first `count` vertices
    pub fn draw_line_loop(&self, pass: &mut wgpu::RenderPass<'_>, count: u32) {
        if count == 0 {
            return;
        }
        self.bind(pass);
        pass.draw_indexed(0..count + 1, 0, 0..1);
    }

    /// Triangles over `count` indices starting at index `offset`
    pub fn draw_triangles(&self, pass: &mut wgpu::RenderPass<'_>, offset: u32, count: u32) {
        if count == 0 {
            return;
        }
        self.bind(pass);
        pass.draw_indexed(offset..offset + count, 0, 0..1);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, call: DrawCall) {
        match call {
            DrawCall::LineLoop { count } => self.draw_line_loop(pass, count),
            DrawCall::Triangles { offset, count } => self.draw_triangles(pass, offset, count),
        }
    }

    fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_bytes() {
        let layout = BufferLayout::new(100, Topology::LineLoop);
        assert_eq!(layout.capacity_bytes(), 100 * 3 * 4);
    }

    #[test]
    fn test_check_accepts_up_to_capacity() {
        let layout = BufferLayout::new(4, Topology::LineLoop);
        assert_eq!(layout.check(&[0.0; 12]).unwrap(), 4);
        assert_eq!(layout.check(&[0.0; 6]).unwrap(), 2);
        assert_eq!(layout.check(&[]).unwrap(), 0);
    }

    #[test]
    fn test_check_rejects_over_capacity() {
        let layout = BufferLayout::new(4, Topology::LineLoop);
        let err = layout.check(&[0.0; 15]).unwrap_err();
        assert!(matches!(
            err,
            BufferError::CapacityExceeded {
                requested: 5,
                capacity: 4
            }
        ));
    }

    #[test]
    fn test_check_rejects_partial_vertex() {
        let layout = BufferLayout::new(4, Topology::Quads);
        assert!(matches!(
            layout.check(&[0.0; 7]),
            Err(BufferError::Misaligned(7))
        ));
    }

    #[test]
    fn test_line_loop_indices_close() {
        assert_eq!(line_loop_indices(4), vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_quad_indices_share_diagonal() {
        assert_eq!(
            quad_indices(2),
            vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]
        );
    }

    #[test]
    fn test_draw_call_per_topology() {
        assert_eq!(
            DrawCall::for_topology(Topology::LineLoop, 100),
            DrawCall::LineLoop { count: 100 }
        );
        assert_eq!(
            DrawCall::for_topology(Topology::Quads, 40),
            DrawCall::Triangles {
                offset: 0,
                count: 60
            }
        );
    }

    #[test]
    fn test_gpu_upload_rejects_overflow() {
        // May fail on CI without GPU, so skip when no adapter is available
        let Some((device, queue)) = pollster::block_on(headless_device()) else {
            return;
        };

        let mut buffer = GeometryBuffer::new(&device, 8, Topology::LineLoop);
        assert!(buffer.upload(&device, &queue, &[1.0; 24]).is_ok());
        assert!(buffer.upload(&device, &queue, &[1.0; 9]).is_ok());
        assert!(matches!(
            buffer.upload(&device, &queue, &[1.0; 27]),
            Err(BufferError::CapacityExceeded { .. })
        ));
    }

    async fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await?;
        adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .ok()
    }
}
