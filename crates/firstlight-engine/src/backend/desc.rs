use std::ops::Range;

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowDesc {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowDesc {
    fn default() -> Self {
        Self {
            title: "firstlight".to_string(),
            width: 640,
            height: 480,
            resizable: false,
        }
    }
}

/// Render pipeline description.
///
/// Vertices are synthesized in the shader, so there are no vertex buffer
/// layouts; the layout is derived from the shader by the backend.
#[derive(Debug, Clone)]
pub struct PipelineSpec<'a> {
    pub label: &'a str,
    pub shader_source: &'a str,
    pub vs_entry: &'a str,
    pub fs_entry: &'a str,
    pub primitive: wgpu::PrimitiveState,
    pub color_targets: Vec<wgpu::ColorTargetState>,
    pub multisample: wgpu::MultisampleState,
}

/// One render pass: a clear of the color attachment plus an optional draw.
#[derive(Debug)]
pub struct PassSpec<'a, P> {
    pub label: &'a str,
    pub clear_color: wgpu::Color,
    pub draw: Option<DrawSpec<'a, P>>,
}

/// A single non-indexed draw with a bound pipeline.
#[derive(Debug)]
pub struct DrawSpec<'a, P> {
    pub pipeline: &'a P,
    pub vertices: Range<u32>,
    pub instances: Range<u32>,
}
