//! GPU device context.
//!
//! Owns the wgpu instance/surface/device/queue plus the depth texture the
//! screen passes render against. Applications create one per window and
//! acquire a [`GpuFrame`] each redraw.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
