//! Seam between the demo control flow and the graphics + windowing stack.
//!
//! The trait abstracts the stateful handles only (instance, window, surface,
//! adapter, device, queue, swap chain, per-frame objects). Fixed-function
//! descriptor data crosses the seam as plain `wgpu` data types, so both the
//! production implementation and the recording test double speak the same
//! vocabulary.

mod desc;
mod gpu;

#[cfg(test)]
pub(crate) mod mock;

pub use desc::{DrawSpec, PassSpec, PipelineSpec, WindowDesc};
pub use gpu::{DemoWindow, GpuBackend, GpuInit, SwapChain};

/// Graphics + windowing operations consumed by the demo control flow.
///
/// Every acquisition step that can fail returns `Option`; the caller decides
/// how failure propagates. Release methods take ownership, and an
/// implementation observes every release.
pub trait Backend {
    type Instance;
    type Window;
    type Surface;
    type Adapter;
    type Device;
    type Queue;
    type SwapChain;
    type Pipeline;
    type Frame;
    type Encoder;
    type CommandBuffer;

    // Acquisition, in bootstrap order.
    fn create_instance(&mut self) -> Option<Self::Instance>;
    fn open_window(&mut self, desc: &WindowDesc) -> Option<Self::Window>;
    fn create_surface(
        &mut self,
        instance: &Self::Instance,
        window: &Self::Window,
    ) -> Option<Self::Surface>;
    fn request_adapter(
        &mut self,
        instance: &Self::Instance,
        surface: &Self::Surface,
    ) -> Option<Self::Adapter>;
    fn request_device(&mut self, adapter: &Self::Adapter) -> Option<(Self::Device, Self::Queue)>;

    /// Reports the surface format presentation and pipelines should target.
    fn preferred_surface_format(
        &self,
        surface: &Self::Surface,
        adapter: &Self::Adapter,
    ) -> wgpu::TextureFormat;

    /// Current drawable size of the window, in physical pixels.
    fn drawable_size(&self, window: &Self::Window) -> (u32, u32);

    fn create_swap_chain(
        &mut self,
        device: &Self::Device,
        surface: &Self::Surface,
        config: &wgpu::SurfaceConfiguration,
    ) -> Self::SwapChain;

    fn create_pipeline(
        &mut self,
        device: &Self::Device,
        spec: &PipelineSpec<'_>,
    ) -> Self::Pipeline;

    // Per-frame operations, in recording order.
    fn poll_events(&mut self, window: &mut Self::Window);
    fn close_requested(&self, window: &Self::Window) -> bool;
    fn acquire_frame(
        &mut self,
        surface: &Self::Surface,
        swap_chain: &mut Self::SwapChain,
    ) -> Option<Self::Frame>;
    fn create_encoder(&mut self, device: &Self::Device) -> Self::Encoder;
    fn record_pass(
        &mut self,
        encoder: &mut Self::Encoder,
        frame: &Self::Frame,
        pass: &PassSpec<'_, Self::Pipeline>,
    );
    fn release_frame(&mut self, frame: Self::Frame);
    fn finish_encoder(&mut self, encoder: Self::Encoder) -> Self::CommandBuffer;
    fn submit(&mut self, queue: &Self::Queue, commands: Self::CommandBuffer);
    fn present(&mut self, swap_chain: &mut Self::SwapChain);

    // Teardown, called in reverse acquisition order.
    fn release_swap_chain(&mut self, swap_chain: Self::SwapChain);
    fn release_device(&mut self, device: Self::Device);
    fn release_adapter(&mut self, adapter: Self::Adapter);
    fn release_surface(&mut self, surface: Self::Surface);
    fn close_window(&mut self, window: Self::Window);
    fn release_instance(&mut self, instance: Self::Instance);
}
