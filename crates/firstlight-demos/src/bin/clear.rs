//! Clear-only variant: opens the window and clears it every frame, with no
//! pipeline and no draw call.

use firstlight_engine::backend::{GpuBackend, GpuInit};
use firstlight_engine::demo::{Demo, DemoConfig};
use firstlight_engine::logging::{init_logging, LoggingConfig};

fn main() {
    init_logging(LoggingConfig::default());

    let backend = GpuBackend::new(GpuInit::default());
    let demo = Demo::new(backend, DemoConfig::default());

    if let Err(err) = demo.run_clear() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
