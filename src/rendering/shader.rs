//! Shader asset loading, compilation and pipeline linking.

use std::fmt;
use std::path::{Path, PathBuf};

use super::buffer::BufferLayout;
use crate::wave::Topology;

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// WGSL entry point expected in the stage's source
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "Vertex Shader"),
            ShaderStage::Fragment => write!(f, "Fragment Shader"),
        }
    }
}

/// Errors raised while building the shader program
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("Failed to load {stage} from {}: {source}", .path.display())]
    Asset {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} compilation error: {log}\nShader Source:\n{shader_source}")]
    Compile {
        stage: ShaderStage,
        log: String,
        shader_source: String,
    },
    #[error("Failed to link program: {log}")]
    Link { log: String },
}

/// Read a stage's WGSL source from disk
pub fn load_source(path: &Path, stage: ShaderStage) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Asset {
        stage,
        path: path.to_path_buf(),
        source,
    })
}

/// Compile one stage, collecting the compiler's error messages on failure
pub fn compile(
    device: &wgpu::Device,
    source: &str,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "Wave Vertex Shader",
            ShaderStage::Fragment => "Wave Fragment Shader",
        }),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let info = pollster::block_on(module.get_compilation_info());
    let scope_error = pollster::block_on(device.pop_error_scope());

    let mut log = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| m.message.clone())
        .collect::<Vec<_>>()
        .join("\n");

    if let Some(err) = scope_error {
        if log.is_empty() {
            log = err.to_string();
        }
    } else if log.is_empty() {
        return Ok(module);
    }

    Err(ShaderError::Compile {
        stage,
        log,
        shader_source: source.to_string(),
    })
}

/// Link compiled stages into a render pipeline drawing `topology`
pub fn link(
    device: &wgpu::Device,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
    bind_group_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
    topology: Topology,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    let (primitive_topology, strip_index_format) = match topology {
        Topology::LineLoop => (
            wgpu::PrimitiveTopology::LineStrip,
            Some(wgpu::IndexFormat::Uint32),
        ),
        Topology::Quads => (wgpu::PrimitiveTopology::TriangleList, None),
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Wave Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Wave Render Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: Some(ShaderStage::Vertex.entry_point()),
            buffers: &[BufferLayout::vertex_buffer_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: Some(ShaderStage::Fragment.entry_point()),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: primitive_topology,
            strip_index_format,
            front_face: wgpu::FrontFace::Ccw,
            // Quad winding flips with the sign of dx/dz, so draw both faces
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(ShaderError::Link {
            log: err.to_string(),
        }),
        None => Ok(pipeline),
    }
}
