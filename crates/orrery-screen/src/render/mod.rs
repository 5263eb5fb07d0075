//! GPU rendering subsystem.
//!
//! Screens stay renderer-agnostic: they produce [`ScreenDraw`](crate::screen::ScreenDraw)
//! snapshots and talk to the GPU through the
//! [`BatchBackend`](crate::batch::BatchBackend) seam. This module provides
//! the wgpu implementation and the transform builders.
//!
//! Convention:
//! - screen geometry is in logical pixels (bottom-left origin, +Y up)
//! - vertices are 3 `f32` position + 3 `u8` color, padded to RGBA on upload

mod batch;
pub mod transform;

pub use batch::{DEPTH_FORMAT, WgpuBatch};
