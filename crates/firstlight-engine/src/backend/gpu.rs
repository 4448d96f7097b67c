use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::{Backend, PassSpec, PipelineSpec, WindowDesc};

/// Initialization parameters for the wgpu backend.
///
/// Keep this structure minimal; add knobs only when a concrete platform or
/// backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Which platform backends wgpu may pick from.
    pub backends: wgpu::Backends,

    /// Adapter preference passed to the adapter request.
    pub power_preference: wgpu::PowerPreference,

    /// Prefer an sRGB surface format when the surface offers one.
    pub prefer_srgb: bool,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
        }
    }
}

/// Production backend over wgpu + winit.
///
/// Adapter/device negotiation is asynchronous under wgpu; this implementation
/// blocks on it, keeping the demo single-threaded. Acquisition failures are
/// logged here with backend detail; the caller only sees the absent handle.
pub struct GpuBackend {
    init: GpuInit,
}

impl GpuBackend {
    pub fn new(init: GpuInit) -> Self {
        Self { init }
    }
}

/// A window driven by pump-style event delivery.
///
/// winit owns the event loop; pumping it with a zero timeout gives the
/// non-blocking poll the frame loop wants.
pub struct DemoWindow {
    event_loop: EventLoop<()>,
    host: WindowHost,
}

impl DemoWindow {
    fn pump(&mut self, timeout: Duration) {
        let status = self.event_loop.pump_app_events(Some(timeout), &mut self.host);
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.host.close_requested = true;
        }
    }
}

struct WindowHost {
    desc: WindowDesc,
    window: Option<Arc<Window>>,
    close_requested: bool,
    failed: bool,
}

impl ApplicationHandler for WindowHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.desc.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(self.desc.width),
                f64::from(self.desc.height),
            ))
            .with_resizable(self.desc.resizable);

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(err) => {
                log::error!("failed to create window: {err}");
                self.failed = true;
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            self.close_requested = true;
        }
    }
}

/// Presentation state for a configured surface.
///
/// wgpu folds the legacy swap-chain object into the surface itself; this type
/// keeps it a distinct handle and carries the acquired texture between
/// acquisition and presentation.
pub struct SwapChain {
    pending: Option<wgpu::SurfaceTexture>,
}

impl Backend for GpuBackend {
    type Instance = wgpu::Instance;
    type Window = DemoWindow;
    type Surface = wgpu::Surface<'static>;
    type Adapter = wgpu::Adapter;
    type Device = wgpu::Device;
    type Queue = wgpu::Queue;
    type SwapChain = SwapChain;
    type Pipeline = wgpu::RenderPipeline;
    type Frame = wgpu::TextureView;
    type Encoder = wgpu::CommandEncoder;
    type CommandBuffer = wgpu::CommandBuffer;

    fn create_instance(&mut self) -> Option<wgpu::Instance> {
        Some(wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: self.init.backends,
            ..Default::default()
        }))
    }

    fn open_window(&mut self, desc: &WindowDesc) -> Option<DemoWindow> {
        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(err) => {
                log::error!("failed to create event loop: {err}");
                return None;
            }
        };

        let mut window = DemoWindow {
            event_loop,
            host: WindowHost {
                desc: desc.clone(),
                window: None,
                close_requested: false,
                failed: false,
            },
        };

        // The first pumps deliver `resumed`, which creates the window.
        while window.host.window.is_none() {
            window.pump(Duration::from_millis(16));
            if window.host.failed || window.host.close_requested {
                return None;
            }
        }

        Some(window)
    }

    fn create_surface(
        &mut self,
        instance: &wgpu::Instance,
        window: &DemoWindow,
    ) -> Option<wgpu::Surface<'static>> {
        let handle = Arc::clone(window.host.window.as_ref()?);
        match instance.create_surface(handle) {
            Ok(surface) => Some(surface),
            Err(err) => {
                log::error!("failed to create wgpu surface: {err}");
                None
            }
        }
    }

    fn request_adapter(
        &mut self,
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> Option<wgpu::Adapter> {
        let request = instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: self.init.power_preference,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        });

        match pollster::block_on(request) {
            Ok(adapter) => {
                log::debug!("adapter: {:?}", adapter.get_info());
                Some(adapter)
            }
            Err(err) => {
                log::error!("failed to find a suitable GPU adapter: {err}");
                None
            }
        }
    }

    fn request_device(&mut self, adapter: &wgpu::Adapter) -> Option<(wgpu::Device, wgpu::Queue)> {
        let request = adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("firstlight device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        });

        match pollster::block_on(request) {
            Ok((device, queue)) => {
                // Invoked by wgpu on its own thread-of-control; it only logs.
                device.on_uncaptured_error(std::sync::Arc::new(|error| {
                    println!("uncaptured device error: {error}");
                }));
                Some((device, queue))
            }
            Err(err) => {
                log::error!("failed to create wgpu device/queue: {err}");
                None
            }
        }
    }

    fn preferred_surface_format(
        &self,
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
    ) -> wgpu::TextureFormat {
        let caps = surface.get_capabilities(adapter);
        preferred_format(&caps, self.init.prefer_srgb)
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb)
    }

    fn drawable_size(&self, window: &DemoWindow) -> (u32, u32) {
        match &window.host.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width, size.height)
            }
            None => (0, 0),
        }
    }

    fn create_swap_chain(
        &mut self,
        device: &wgpu::Device,
        surface: &wgpu::Surface<'static>,
        config: &wgpu::SurfaceConfiguration,
    ) -> SwapChain {
        surface.configure(device, config);
        SwapChain { pending: None }
    }

    fn create_pipeline(
        &mut self,
        device: &wgpu::Device,
        spec: &PipelineSpec<'_>,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(spec.label),
            source: wgpu::ShaderSource::Wgsl(spec.shader_source.into()),
        });

        let targets: Vec<Option<wgpu::ColorTargetState>> =
            spec.color_targets.iter().cloned().map(Some).collect();

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(spec.label),
            layout: None,

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(spec.vs_entry),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(spec.fs_entry),
                compilation_options: Default::default(),
                targets: &targets,
            }),

            primitive: spec.primitive,
            depth_stencil: None,
            multisample: spec.multisample,
            multiview_mask: None,
            cache: None,
        })
    }

    fn poll_events(&mut self, window: &mut DemoWindow) {
        window.pump(Duration::ZERO);
    }

    fn close_requested(&self, window: &DemoWindow) -> bool {
        window.host.close_requested
    }

    fn acquire_frame(
        &mut self,
        surface: &wgpu::Surface<'static>,
        swap_chain: &mut SwapChain,
    ) -> Option<wgpu::TextureView> {
        match surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                swap_chain.pending = Some(texture);
                Some(view)
            }
            Err(err) => {
                log::error!("failed to acquire surface texture: {err}");
                None
            }
        }
    }

    fn create_encoder(&mut self, device: &wgpu::Device) -> wgpu::CommandEncoder {
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame encoder"),
        })
    }

    fn record_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        frame: &wgpu::TextureView,
        pass: &PassSpec<'_, wgpu::RenderPipeline>,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(pass.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(pass.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if let Some(draw) = &pass.draw {
            rpass.set_pipeline(draw.pipeline);
            rpass.draw(draw.vertices.clone(), draw.instances.clone());
        }
    }

    fn release_frame(&mut self, frame: wgpu::TextureView) {
        drop(frame);
    }

    fn finish_encoder(&mut self, encoder: wgpu::CommandEncoder) -> wgpu::CommandBuffer {
        encoder.finish()
    }

    fn submit(&mut self, queue: &wgpu::Queue, commands: wgpu::CommandBuffer) {
        queue.submit(std::iter::once(commands));
    }

    fn present(&mut self, swap_chain: &mut SwapChain) {
        if let Some(texture) = swap_chain.pending.take() {
            texture.present();
        }
    }

    fn release_swap_chain(&mut self, swap_chain: SwapChain) {
        drop(swap_chain);
    }

    fn release_device(&mut self, device: wgpu::Device) {
        drop(device);
    }

    fn release_adapter(&mut self, adapter: wgpu::Adapter) {
        drop(adapter);
    }

    fn release_surface(&mut self, surface: wgpu::Surface<'static>) {
        drop(surface);
    }

    fn close_window(&mut self, window: DemoWindow) {
        drop(window);
    }

    fn release_instance(&mut self, instance: wgpu::Instance) {
        drop(instance);
    }
}

fn preferred_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        if let Some(format) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(format);
        }
    }
    caps.formats.first().copied()
}
