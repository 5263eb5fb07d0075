use std::fmt;

/// Invariant violations reported by the screen layer.
///
/// All operations are local and synchronous: they either succeed or fail
/// fast with one of these, never partially buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenError {
    /// Vertex and color arrays must describe the same vertices (3 floats and
    /// 3 bytes per vertex respectively).
    ColorLengthMismatch { vertices: usize, colors: usize },

    /// A flattened vertex array must be a whole number of 3-float vertices.
    RaggedVertexData { len: usize },

    /// A per-vertex face color slice must supply 3 bytes per corner.
    FaceColorLength { expected: usize, got: usize },

    /// View extents or screen dimensions collapsed to zero (or went
    /// non-finite); the screen↔world mapping is undefined.
    DegenerateExtent { gw: f64, gh: f64 },

    /// The configured zoom ratio must be positive and finite.
    InvalidZoomRatio { ratio: f64 },
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenError::ColorLengthMismatch { vertices, colors } => write!(
                f,
                "vertex and color arrays must have equal length (vertices: {vertices}, colors: {colors})"
            ),
            ScreenError::RaggedVertexData { len } => write!(
                f,
                "vertex array length {len} is not a multiple of 3"
            ),
            ScreenError::FaceColorLength { expected, got } => write!(
                f,
                "per-vertex face colors must be {expected} bytes, got {got}"
            ),
            ScreenError::DegenerateExtent { gw, gh } => write!(
                f,
                "degenerate view extent {gw}x{gh}"
            ),
            ScreenError::InvalidZoomRatio { ratio } => write!(
                f,
                "zoom ratio {ratio} must be positive and finite"
            ),
        }
    }
}

impl std::error::Error for ScreenError {}
