//! Recording backend double for sequencing tests.
//!
//! Handles are plain integers; every operation appends to a shared call log
//! so tests can assert acquisition order, per-frame command sequences, and
//! release order after the demo has consumed the backend.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use super::{Backend, PassSpec, PipelineSpec, WindowDesc};

/// Bootstrap step at which the mock reports an invalid handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Instance,
    Window,
    Surface,
    Adapter,
    Device,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Call {
    CreateInstance,
    OpenWindow,
    CreateSurface,
    RequestAdapter,
    RequestDevice,
    CreateSwapChain,
    CreatePipeline,
    PollEvents,
    AcquireFrame,
    CreateEncoder,
    RecordPass,
    ReleaseFrame,
    FinishEncoder,
    Submit,
    Present,
    ReleaseSwapChain,
    ReleaseDevice,
    ReleaseAdapter,
    ReleaseSurface,
    CloseWindow,
    ReleaseInstance,
}

impl Call {
    pub fn is_release(self) -> bool {
        matches!(
            self,
            Call::ReleaseSwapChain
                | Call::ReleaseDevice
                | Call::ReleaseAdapter
                | Call::ReleaseSurface
                | Call::CloseWindow
                | Call::ReleaseInstance
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub vertices: Range<u32>,
    pub instances: Range<u32>,
}

#[derive(Debug, Clone)]
pub struct RecordedPass {
    pub clear_color: wgpu::Color,
    pub draw: Option<RecordedDraw>,
}

#[derive(Debug, Clone)]
pub struct RecordedPipeline {
    pub color_targets: Vec<wgpu::ColorTargetState>,
    pub primitive: wgpu::PrimitiveState,
    pub sample_count: u32,
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    pub passes: Vec<RecordedPass>,
    pub pipelines: Vec<RecordedPipeline>,
    pub surface_configs: Vec<wgpu::SurfaceConfiguration>,
}

impl Recorder {
    pub fn release_calls(&self) -> Vec<Call> {
        self.calls.iter().copied().filter(|c| c.is_release()).collect()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }
}

pub struct MockBackend {
    recorder: Rc<RefCell<Recorder>>,
    fail_at: Option<Step>,
    frames_before_close: Option<u32>,
    fail_acquire_on: Option<u32>,
    polls: u32,
    acquires: u32,
}

impl MockBackend {
    pub const SURFACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;
    pub const DRAWABLE_SIZE: (u32, u32) = (640, 480);

    /// A backend where every acquisition succeeds and the window never
    /// requests close.
    pub fn new() -> Self {
        Self {
            recorder: Rc::new(RefCell::new(Recorder::default())),
            fail_at: None,
            frames_before_close: None,
            fail_acquire_on: None,
            polls: 0,
            acquires: 0,
        }
    }

    /// Reports an invalid handle at the given bootstrap step.
    pub fn failing(step: Step) -> Self {
        let mut mock = Self::new();
        mock.fail_at = Some(step);
        mock
    }

    /// The window's close flag turns on after `frames` rendered frames.
    pub fn close_after_frames(mut self, frames: u32) -> Self {
        self.frames_before_close = Some(frames);
        self
    }

    /// The `attempt`-th image acquisition (1-based) fails.
    pub fn fail_acquire_on(mut self, attempt: u32) -> Self {
        self.fail_acquire_on = Some(attempt);
        self
    }

    pub fn recorder(&self) -> Rc<RefCell<Recorder>> {
        Rc::clone(&self.recorder)
    }

    fn record(&self, call: Call) {
        self.recorder.borrow_mut().calls.push(call);
    }
}

impl Backend for MockBackend {
    type Instance = u32;
    type Window = u32;
    type Surface = u32;
    type Adapter = u32;
    type Device = u32;
    type Queue = u32;
    type SwapChain = u32;
    type Pipeline = u32;
    type Frame = u32;
    type Encoder = u32;
    type CommandBuffer = u32;

    fn create_instance(&mut self) -> Option<u32> {
        self.record(Call::CreateInstance);
        (self.fail_at != Some(Step::Instance)).then_some(1)
    }

    fn open_window(&mut self, _desc: &WindowDesc) -> Option<u32> {
        self.record(Call::OpenWindow);
        (self.fail_at != Some(Step::Window)).then_some(2)
    }

    fn create_surface(&mut self, _instance: &u32, _window: &u32) -> Option<u32> {
        self.record(Call::CreateSurface);
        (self.fail_at != Some(Step::Surface)).then_some(3)
    }

    fn request_adapter(&mut self, _instance: &u32, _surface: &u32) -> Option<u32> {
        self.record(Call::RequestAdapter);
        (self.fail_at != Some(Step::Adapter)).then_some(4)
    }

    fn request_device(&mut self, _adapter: &u32) -> Option<(u32, u32)> {
        self.record(Call::RequestDevice);
        (self.fail_at != Some(Step::Device)).then_some((5, 6))
    }

    fn preferred_surface_format(&self, _surface: &u32, _adapter: &u32) -> wgpu::TextureFormat {
        Self::SURFACE_FORMAT
    }

    fn drawable_size(&self, _window: &u32) -> (u32, u32) {
        Self::DRAWABLE_SIZE
    }

    fn create_swap_chain(
        &mut self,
        _device: &u32,
        _surface: &u32,
        config: &wgpu::SurfaceConfiguration,
    ) -> u32 {
        self.record(Call::CreateSwapChain);
        self.recorder
            .borrow_mut()
            .surface_configs
            .push(config.clone());
        7
    }

    fn create_pipeline(&mut self, _device: &u32, spec: &PipelineSpec<'_>) -> u32 {
        self.record(Call::CreatePipeline);
        self.recorder.borrow_mut().pipelines.push(RecordedPipeline {
            color_targets: spec.color_targets.clone(),
            primitive: spec.primitive,
            sample_count: spec.multisample.count,
        });
        8
    }

    fn poll_events(&mut self, _window: &mut u32) {
        self.record(Call::PollEvents);
        self.polls += 1;
    }

    fn close_requested(&self, _window: &u32) -> bool {
        matches!(self.frames_before_close, Some(frames) if self.polls > frames)
    }

    fn acquire_frame(&mut self, _surface: &u32, _swap_chain: &mut u32) -> Option<u32> {
        self.record(Call::AcquireFrame);
        self.acquires += 1;
        (self.fail_acquire_on != Some(self.acquires)).then_some(9)
    }

    fn create_encoder(&mut self, _device: &u32) -> u32 {
        self.record(Call::CreateEncoder);
        10
    }

    fn record_pass(&mut self, _encoder: &mut u32, _frame: &u32, pass: &PassSpec<'_, u32>) {
        self.record(Call::RecordPass);
        self.recorder.borrow_mut().passes.push(RecordedPass {
            clear_color: pass.clear_color,
            draw: pass.draw.as_ref().map(|draw| RecordedDraw {
                vertices: draw.vertices.clone(),
                instances: draw.instances.clone(),
            }),
        });
    }

    fn release_frame(&mut self, _frame: u32) {
        self.record(Call::ReleaseFrame);
    }

    fn finish_encoder(&mut self, _encoder: u32) -> u32 {
        self.record(Call::FinishEncoder);
        11
    }

    fn submit(&mut self, _queue: &u32, _commands: u32) {
        self.record(Call::Submit);
    }

    fn present(&mut self, _swap_chain: &mut u32) {
        self.record(Call::Present);
    }

    fn release_swap_chain(&mut self, _swap_chain: u32) {
        self.record(Call::ReleaseSwapChain);
    }

    fn release_device(&mut self, _device: u32) {
        self.record(Call::ReleaseDevice);
    }

    fn release_adapter(&mut self, _adapter: u32) {
        self.record(Call::ReleaseAdapter);
    }

    fn release_surface(&mut self, _surface: u32) {
        self.record(Call::ReleaseSurface);
    }

    fn close_window(&mut self, _window: u32) {
        self.record(Call::CloseWindow);
    }

    fn release_instance(&mut self, _instance: u32) {
        self.record(Call::ReleaseInstance);
    }
}
