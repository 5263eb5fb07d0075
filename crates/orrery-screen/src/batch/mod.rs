//! Primitive batching.
//!
//! Responsibilities:
//! - accumulate flattened vertex/color arrays per shape kind ([`PrimitiveBuffer`])
//! - own the GPU-resident list handles and the flush protocol ([`BatchLists`])
//! - define the upload/release seam renderers implement ([`BatchBackend`])
//!
//! Convention:
//! - vertices are 3 `f32` (x, y, z) per vertex
//! - colors are 3 `u8` (r, g, b) per vertex

mod backend;
mod buffer;
mod kind;
mod lists;

pub use backend::{BatchBackend, ListId, RecordingBatch, UploadRecord};
pub use buffer::{FaceColor, PrimitiveBuffer, Rgb};
pub use kind::{ShapeKind, Topology};
pub use lists::BatchLists;
