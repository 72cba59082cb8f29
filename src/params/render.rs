//! Window and shader pipeline configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window title
    pub title: String,

    /// Window width (logical pixels)
    pub window_width: u32,

    /// Window height (logical pixels)
    pub window_height: u32,

    /// Vertex stage WGSL source
    pub vertex_shader: PathBuf,

    /// Fragment stage WGSL source
    pub fragment_shader: PathBuf,

    /// Background clear color (linear RGBA)
    pub clear_color: [f64; 4],

    /// Wave line/surface color (linear RGBA)
    pub wave_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Acoustic Simulation".to_string(),
            window_width: 1600,
            window_height: 900,
            vertex_shader: PathBuf::from("shader/vertex.wgsl"),
            fragment_shader: PathBuf::from("shader/fragment.wgsl"),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            wave_color: [0.2, 0.8, 1.0, 1.0],
        }
    }
}

impl RenderConfig {
    /// Point both shader paths at `dir`, keeping their file names
    pub fn with_shader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let vertex_name = self
            .vertex_shader
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("vertex.wgsl"));
        let fragment_name = self
            .fragment_shader
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("fragment.wgsl"));
        self.vertex_shader = dir.join(vertex_name);
        self.fragment_shader = dir.join(fragment_name);
        self
    }
}
