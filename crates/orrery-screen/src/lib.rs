//! Orrery screen crate.
//!
//! Drawable "screens" over a wgpu/winit stack: primitive batching, a
//! zoomable 2D graph view, and a simple 3D camera view.

pub mod device;
pub mod input;

pub mod logging;
pub mod coords;
pub mod value;
pub mod batch;
pub mod screen;
pub mod render;

mod error;

pub use error::ScreenError;
