//! Shared control flow for the demo pair.
//!
//! `Demo` owns a backend and drives the whole program life cycle: bootstrap
//! the graphics stack, optionally build the triangle pipeline, loop until the
//! window closes or a frame cannot be acquired, then release every acquired
//! handle in reverse order. The two public entry points correspond to the two
//! binaries; there is no runtime switch between them.

use anyhow::{bail, Context, Result};

use crate::backend::{Backend, DrawSpec, PassSpec, PipelineSpec, WindowDesc};
use crate::time::FrameClock;

/// Clear color applied to every frame of both variants.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.9,
    g: 0.1,
    b: 0.2,
    a: 1.0,
};

const TRIANGLE_SHADER: &str = include_str!("shaders/triangle.wgsl");

/// Demo configuration.
///
/// The window is fixed-size and non-resizable; FIFO presentation is the only
/// frame pacing in effect.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub window: WindowDesc,
    pub present_mode: wgpu::PresentMode,
    pub max_frame_latency: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowDesc::default(),
            present_mode: wgpu::PresentMode::Fifo,
            max_frame_latency: 2,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Variant {
    ClearOnly,
    Triangle,
}

/// Long-lived handles, in acquisition order.
///
/// Each slot is populated as bootstrap progresses and drained in reverse
/// order at teardown, so an early failure releases exactly the handles that
/// were acquired.
struct Handles<B: Backend> {
    instance: Option<B::Instance>,
    window: Option<B::Window>,
    surface: Option<B::Surface>,
    adapter: Option<B::Adapter>,
    device: Option<B::Device>,
    queue: Option<B::Queue>,
    swap_chain: Option<B::SwapChain>,
}

impl<B: Backend> Handles<B> {
    fn new() -> Self {
        Self {
            instance: None,
            window: None,
            surface: None,
            adapter: None,
            device: None,
            queue: None,
            swap_chain: None,
        }
    }

    fn instance(&self) -> Result<&B::Instance> {
        self.instance.as_ref().context("graphics instance not acquired")
    }

    fn window(&self) -> Result<&B::Window> {
        self.window.as_ref().context("window not acquired")
    }

    fn window_mut(&mut self) -> Result<&mut B::Window> {
        self.window.as_mut().context("window not acquired")
    }

    fn surface(&self) -> Result<&B::Surface> {
        self.surface.as_ref().context("rendering surface not acquired")
    }

    fn adapter(&self) -> Result<&B::Adapter> {
        self.adapter.as_ref().context("adapter not acquired")
    }

    fn device(&self) -> Result<&B::Device> {
        self.device.as_ref().context("device not acquired")
    }

    fn queue(&self) -> Result<&B::Queue> {
        self.queue.as_ref().context("command queue not acquired")
    }

    fn swap_chain_mut(&mut self) -> Result<&mut B::SwapChain> {
        self.swap_chain.as_mut().context("swap chain not configured")
    }

    /// Splits the borrows image acquisition needs.
    fn acquire_pair(&mut self) -> Result<(&B::Surface, &mut B::SwapChain)> {
        match (&self.surface, &mut self.swap_chain) {
            (Some(surface), Some(swap_chain)) => Ok((surface, swap_chain)),
            _ => bail!("presentation handles not acquired"),
        }
    }
}

/// One runnable demo instance.
pub struct Demo<B: Backend> {
    backend: B,
    config: DemoConfig,
    handles: Handles<B>,
    pipeline: Option<B::Pipeline>,
    surface_format: Option<wgpu::TextureFormat>,
    clock: FrameClock,
}

impl<B: Backend> Demo<B> {
    pub fn new(backend: B, config: DemoConfig) -> Self {
        Self {
            backend,
            config,
            handles: Handles::new(),
            pipeline: None,
            surface_format: None,
            clock: FrameClock::new(),
        }
    }

    /// Runs the clear-only variant: every frame opens and closes a render
    /// pass that clears the surface, with no pipeline and no draw.
    pub fn run_clear(self) -> Result<()> {
        self.run(Variant::ClearOnly)
    }

    /// Runs the triangle variant: every frame clears the surface and draws
    /// one hard-coded triangle.
    pub fn run_triangle(self) -> Result<()> {
        self.run(Variant::Triangle)
    }

    fn run(mut self, variant: Variant) -> Result<()> {
        let outcome = self.boot_and_loop(variant);
        self.teardown();
        outcome
    }

    fn boot_and_loop(&mut self, variant: Variant) -> Result<()> {
        self.bootstrap()?;
        if variant == Variant::Triangle {
            self.build_pipeline()?;
        }
        self.frame_loop()
    }

    /// Acquires the graphics stack in fixed order, failing fast on the first
    /// absent handle. Milestones go to stdout; failure detail is logged by
    /// the backend and the returned error names the step.
    fn bootstrap(&mut self) -> Result<()> {
        let instance = self
            .backend
            .create_instance()
            .context("failed to create graphics instance")?;
        println!("got graphics instance");
        self.handles.instance = Some(instance);

        let window = self
            .backend
            .open_window(&self.config.window)
            .context("failed to open window")?;
        self.handles.window = Some(window);

        let surface = self
            .backend
            .create_surface(self.handles.instance()?, self.handles.window()?)
            .context("failed to create rendering surface")?;
        self.handles.surface = Some(surface);

        println!("requesting adapter...");
        let adapter = self
            .backend
            .request_adapter(self.handles.instance()?, self.handles.surface()?)
            .context("no compatible graphics adapter found")?;
        println!("got adapter");
        self.handles.adapter = Some(adapter);

        println!("requesting device...");
        let (device, queue) = self
            .backend
            .request_device(self.handles.adapter()?)
            .context("failed to create logical device")?;
        self.handles.device = Some(device);
        self.handles.queue = Some(queue);

        let format = self
            .backend
            .preferred_surface_format(self.handles.surface()?, self.handles.adapter()?);
        let (width, height) = self.backend.drawable_size(self.handles.window()?);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: self.config.present_mode,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: self.config.max_frame_latency,
        };

        let swap_chain = self.backend.create_swap_chain(
            self.handles.device()?,
            self.handles.surface()?,
            &surface_config,
        );
        println!(
            "swap chain configured: {}x{} {:?}",
            surface_config.width, surface_config.height, format
        );
        self.handles.swap_chain = Some(swap_chain);
        self.surface_format = Some(format);

        Ok(())
    }

    /// Builds the one render pipeline of the triangle variant.
    fn build_pipeline(&mut self) -> Result<()> {
        let format = self.surface_format.context("surface format not negotiated")?;

        let desc = PipelineSpec {
            label: "triangle pipeline",
            shader_source: TRIANGLE_SHADER,
            vs_entry: "vs_main",
            fs_entry: "fs_main",
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            color_targets: vec![wgpu::ColorTargetState {
                format,
                blend: Some(source_over_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            }],
            multisample: wgpu::MultisampleState::default(),
        };

        let pipeline = self.backend.create_pipeline(self.handles.device()?, &desc);
        self.pipeline = Some(pipeline);
        Ok(())
    }

    /// Running → Closing state machine. Returns `Ok` on window close and an
    /// error when the next presentable image cannot be acquired.
    fn frame_loop(&mut self) -> Result<()> {
        loop {
            self.backend.poll_events(self.handles.window_mut()?);
            if self.backend.close_requested(self.handles.window()?) {
                return Ok(());
            }

            let (surface, swap_chain) = self.handles.acquire_pair()?;
            let Some(frame) = self.backend.acquire_frame(surface, swap_chain) else {
                bail!("cannot acquire the next presentable image");
            };

            let mut encoder = self.backend.create_encoder(self.handles.device()?);
            let pass = PassSpec {
                label: "frame pass",
                clear_color: CLEAR_COLOR,
                draw: self.pipeline.as_ref().map(|pipeline| DrawSpec {
                    pipeline,
                    vertices: 0..3,
                    instances: 0..1,
                }),
            };
            self.backend.record_pass(&mut encoder, &frame, &pass);
            self.backend.release_frame(frame);

            let commands = self.backend.finish_encoder(encoder);
            self.backend.submit(self.handles.queue()?, commands);
            self.backend.present(self.handles.swap_chain_mut()?);

            let ft = self.clock.tick();
            log::trace!("frame {} presented ({:.2} ms)", ft.frame_index, ft.dt * 1000.0);
        }
    }

    /// Releases every acquired handle exactly once, newest first. Slots that
    /// never filled (bootstrap failed earlier) are skipped.
    fn teardown(&mut self) {
        self.pipeline = None;

        if let Some(swap_chain) = self.handles.swap_chain.take() {
            self.backend.release_swap_chain(swap_chain);
        }
        // The queue has no explicit release; it goes down with its device.
        let _ = self.handles.queue.take();
        if let Some(device) = self.handles.device.take() {
            self.backend.release_device(device);
        }
        if let Some(adapter) = self.handles.adapter.take() {
            self.backend.release_adapter(adapter);
        }
        if let Some(surface) = self.handles.surface.take() {
            self.backend.release_surface(surface);
        }
        if let Some(window) = self.handles.window.take() {
            self.backend.close_window(window);
        }
        if let Some(instance) = self.handles.instance.take() {
            self.backend.release_instance(instance);
        }
    }
}

/// Source-over blending for the color channels, passthrough alpha.
fn source_over_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Zero,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
