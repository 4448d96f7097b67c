//! Firstlight engine crate.
//!
//! Owns the pieces shared by the demo binaries: the backend seam over the
//! graphics + windowing stack, its wgpu/winit implementation, and the
//! bootstrap / frame-loop / teardown control flow.

pub mod backend;
pub mod demo;
pub mod logging;
pub mod time;
