//! Triangle variant: clears the window every frame and draws one hard-coded
//! triangle with the embedded shader pair.

use firstlight_engine::backend::{GpuBackend, GpuInit};
use firstlight_engine::demo::{Demo, DemoConfig};
use firstlight_engine::logging::{init_logging, LoggingConfig};

fn main() {
    init_logging(LoggingConfig::default());

    let backend = GpuBackend::new(GpuInit::default());
    let demo = Demo::new(backend, DemoConfig::default());

    if let Err(err) = demo.run_triangle() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
