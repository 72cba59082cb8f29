//! Rendering system with wgpu pipeline and shader management.

mod buffer;
mod shader;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use buffer::{
    line_loop_indices, quad_indices, BufferError, BufferLayout, DrawCall, GeometryBuffer,
    FLOATS_PER_VERTEX,
};
pub use shader::{compile, link, load_source, ShaderError, ShaderStage};

use crate::coords::Viewport;
use crate::frame::FrameTarget;
use crate::params::RenderConfig;
use crate::wave::WaveField;

/// Errors that can occur while acquiring the window's GPU resources
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("Failed to find suitable GPU adapter")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("Surface reports no supported formats")]
    NoSurfaceFormat,
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// Uniform buffer for the fragment stage
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaveUniforms {
    pub color: [f32; 4],
}

/// Run `f` inside validation and out-of-memory error scopes, logging any
/// GPU error against `operation`
///
/// Errors are advisory: they are logged and never returned.
pub fn with_error_scope<R>(device: &wgpu::Device, operation: &str, f: impl FnOnce() -> R) -> R {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let result = f();

    for _ in 0..2 {
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            log::warn!("GPU error after {}: {}", operation, err);
        }
    }
    result
}

/// Rendering system owning the surface, device, program and wave geometry
pub struct RenderSystem {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// `None` once the program has been released
    pipeline: Option<wgpu::RenderPipeline>,
    uniform_bind_group: wgpu::BindGroup,
    geometry: GeometryBuffer,
    clear_color: wgpu::Color,
}

impl RenderSystem {
    /// Create the GPU context, load and link shaders, allocate geometry
    pub async fn new(
        window: Arc<Window>,
        render_config: &RenderConfig,
        field: &WaveField,
    ) -> Result<Self, StartupError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Surface needs a 'static window, hence the Arc clone
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(StartupError::NoAdapter)?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Wave Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Stray errors outside a scope are logged, never fatal
        device.on_uncaptured_error(Box::new(|err| {
            log::warn!("Uncaptured GPU error: {}", err);
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(StartupError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Load and compile shaders
        let vertex_source = load_source(&render_config.vertex_shader, ShaderStage::Vertex)?;
        let fragment_source = load_source(&render_config.fragment_shader, ShaderStage::Fragment)?;
        log::info!("Shaders loaded");

        let vertex = compile(&device, &vertex_source, ShaderStage::Vertex)?;
        let fragment = compile(&device, &fragment_source, ShaderStage::Fragment)?;

        let uniforms = WaveUniforms {
            color: render_config.wave_color,
        };

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Wave Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Wave Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline = link(
            &device,
            &vertex,
            &fragment,
            &uniform_bind_group_layout,
            config.format,
            field.topology(),
        )?;
        log::info!("Shader program created");

        let geometry = GeometryBuffer::new(&device, field.vertex_count(), field.topology());

        let [r, g, b, a] = render_config.clear_color;
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline: Some(pipeline),
            uniform_bind_group,
            geometry,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    /// Reconfigure the surface after the window's physical size changed
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }
}

impl FrameTarget for RenderSystem {
    fn viewport(&self) -> Viewport {
        let size = self
            .window
            .inner_size()
            .to_logical::<u32>(self.window.scale_factor());
        Viewport::new(size.width, size.height)
    }

    fn upload(&mut self, vertices: &[f32]) -> Result<(), BufferError> {
        self.geometry.upload(&self.device, &self.queue, vertices)
    }

    fn render(&mut self, draw: DrawCall) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("Failed to acquire frame: {}", e);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        with_error_scope(&self.device, "draw", || {
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });

            {
                let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.clear_color),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                self.geometry.draw(&mut render_pass, draw);
            }

            self.queue.submit(std::iter::once(encoder.finish()));
        });

        self.window.pre_present_notify();
        output.present();
    }

    fn release(&mut self) {
        if self.pipeline.take().is_some() {
            log::info!("Shader program released");
        }
    }
}
