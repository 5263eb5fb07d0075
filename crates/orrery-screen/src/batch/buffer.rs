use crate::error::ScreenError;

use super::ShapeKind;

/// RGB color, one byte per channel.
pub type Rgb = [u8; 3];

/// Coloring of a triangle or quad face.
///
/// The two forms are mutually exclusive: either one color replicated across
/// the face's vertices, or an explicit 3-bytes-per-corner slice.
#[derive(Debug, Copy, Clone)]
pub enum FaceColor<'a> {
    Uniform(Rgb),
    PerVertex(&'a [u8]),
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Entry {
    vertices: Vec<f32>,
    colors: Vec<u8>,
}

/// Per-kind accumulation of flattened vertex and color arrays.
///
/// Invariant (enforced at every mutation): for each kind,
/// `vertices.len() == colors.len()` and both are a whole number of vertices
/// (3 floats / 3 bytes each). Violations fail fast; nothing is buffered
/// partially.
///
/// Contents reflect only calls made since the last flush.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PrimitiveBuffer {
    entries: [Entry; ShapeKind::COUNT],
}

impl PrimitiveBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the buffered arrays for a kind.
    pub fn set(
        &mut self,
        kind: ShapeKind,
        vertices: Vec<f32>,
        colors: Vec<u8>,
    ) -> Result<(), ScreenError> {
        check_arrays(&vertices, &colors)?;
        let entry = &mut self.entries[kind.index()];
        entry.vertices = vertices;
        entry.colors = colors;
        Ok(())
    }

    pub fn set_points(&mut self, vertices: Vec<f32>, colors: Vec<u8>) -> Result<(), ScreenError> {
        self.set(ShapeKind::Points, vertices, colors)
    }

    pub fn set_lines(&mut self, vertices: Vec<f32>, colors: Vec<u8>) -> Result<(), ScreenError> {
        self.set(ShapeKind::Lines, vertices, colors)
    }

    /// Line strips have no incremental add; this is the only way to fill them.
    pub fn set_line_strip(
        &mut self,
        vertices: Vec<f32>,
        colors: Vec<u8>,
    ) -> Result<(), ScreenError> {
        self.set(ShapeKind::LineStrip, vertices, colors)
    }

    pub fn set_triangles(
        &mut self,
        vertices: Vec<f32>,
        colors: Vec<u8>,
    ) -> Result<(), ScreenError> {
        self.set(ShapeKind::Triangles, vertices, colors)
    }

    pub fn set_quads(&mut self, vertices: Vec<f32>, colors: Vec<u8>) -> Result<(), ScreenError> {
        self.set(ShapeKind::Quads, vertices, colors)
    }

    /// Appends one point.
    pub fn add_point(&mut self, x: f32, y: f32, z: f32, color: Rgb) {
        let entry = &mut self.entries[ShapeKind::Points.index()];
        entry.vertices.extend([x, y, z]);
        entry.colors.extend(color);
    }

    /// Appends many points from flattened arrays.
    pub fn add_points(&mut self, vertices: &[f32], colors: &[u8]) -> Result<(), ScreenError> {
        check_arrays(vertices, colors)?;
        let entry = &mut self.entries[ShapeKind::Points.index()];
        entry.vertices.extend_from_slice(vertices);
        entry.colors.extend_from_slice(colors);
        Ok(())
    }

    /// Appends one line segment.
    pub fn add_line(&mut self, a: [f32; 3], b: [f32; 3], color: Rgb) {
        let entry = &mut self.entries[ShapeKind::Lines.index()];
        entry.vertices.extend(a);
        entry.vertices.extend(b);
        entry.colors.extend(color);
        entry.colors.extend(color);
    }

    /// Appends one triangle.
    pub fn add_triangle(
        &mut self,
        corners: [[f32; 3]; 3],
        color: FaceColor<'_>,
    ) -> Result<(), ScreenError> {
        self.add_face(ShapeKind::Triangles, &corners, color)
    }

    /// Appends one quadrilateral (4 vertices, consistent winding).
    pub fn add_quad(
        &mut self,
        corners: [[f32; 3]; 4],
        color: FaceColor<'_>,
    ) -> Result<(), ScreenError> {
        self.add_face(ShapeKind::Quads, &corners, color)
    }

    fn add_face(
        &mut self,
        kind: ShapeKind,
        corners: &[[f32; 3]],
        color: FaceColor<'_>,
    ) -> Result<(), ScreenError> {
        if let FaceColor::PerVertex(bytes) = color {
            let expected = corners.len() * 3;
            if bytes.len() != expected {
                return Err(ScreenError::FaceColorLength { expected, got: bytes.len() });
            }
        }

        let entry = &mut self.entries[kind.index()];
        for corner in corners {
            entry.vertices.extend(corner);
        }
        match color {
            FaceColor::Uniform(rgb) => {
                for _ in 0..corners.len() {
                    entry.colors.extend(rgb);
                }
            }
            FaceColor::PerVertex(bytes) => entry.colors.extend_from_slice(bytes),
        }
        Ok(())
    }

    /// Buffered arrays for a kind.
    #[inline]
    pub fn data(&self, kind: ShapeKind) -> (&[f32], &[u8]) {
        let entry = &self.entries[kind.index()];
        (&entry.vertices, &entry.colors)
    }

    #[inline]
    pub fn vertex_count(&self, kind: ShapeKind) -> usize {
        self.entries[kind.index()].vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.vertices.is_empty())
    }

    /// Empties every kind's arrays. Called at the end of each flush.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.vertices.clear();
            entry.colors.clear();
        }
    }
}

fn check_arrays(vertices: &[f32], colors: &[u8]) -> Result<(), ScreenError> {
    if vertices.len() % 3 != 0 {
        return Err(ScreenError::RaggedVertexData { len: vertices.len() });
    }
    if vertices.len() != colors.len() {
        return Err(ScreenError::ColorLengthMismatch {
            vertices: vertices.len(),
            colors: colors.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = [255, 0, 0];

    // ── add ───────────────────────────────────────────────────────────────

    #[test]
    fn add_point_appends_one_vertex() {
        let mut buf = PrimitiveBuffer::new();
        buf.add_point(1.0, 2.0, 3.0, RED);
        buf.add_point(4.0, 5.0, 6.0, RED);

        let (vertices, colors) = buf.data(ShapeKind::Points);
        assert_eq!(vertices, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(colors, &[255, 0, 0, 255, 0, 0]);
        assert_eq!(buf.vertex_count(ShapeKind::Points), 2);
    }

    #[test]
    fn add_points_rejects_length_mismatch() {
        let mut buf = PrimitiveBuffer::new();
        let err = buf.add_points(&[0.0; 6], &[0; 3]).unwrap_err();
        assert_eq!(err, ScreenError::ColorLengthMismatch { vertices: 6, colors: 3 });
        // Nothing was buffered.
        assert!(buf.is_empty());
    }

    #[test]
    fn add_points_rejects_ragged_vertices() {
        let mut buf = PrimitiveBuffer::new();
        let err = buf.add_points(&[0.0; 5], &[0; 5]).unwrap_err();
        assert_eq!(err, ScreenError::RaggedVertexData { len: 5 });
    }

    #[test]
    fn add_line_replicates_color() {
        let mut buf = PrimitiveBuffer::new();
        buf.add_line([0.0, 0.0, 0.0], [1.0, 1.0, 0.0], RED);

        let (vertices, colors) = buf.data(ShapeKind::Lines);
        assert_eq!(vertices.len(), 6);
        assert_eq!(colors, &[255, 0, 0, 255, 0, 0]);
    }

    // ── faces ─────────────────────────────────────────────────────────────

    #[test]
    fn add_triangle_uniform_color() {
        let mut buf = PrimitiveBuffer::new();
        buf.add_triangle(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            FaceColor::Uniform(RED),
        )
        .unwrap();

        let (vertices, colors) = buf.data(ShapeKind::Triangles);
        assert_eq!(vertices.len(), 9);
        assert_eq!(colors, &[255, 0, 0, 255, 0, 0, 255, 0, 0]);
    }

    #[test]
    fn add_quad_per_vertex_color() {
        let mut buf = PrimitiveBuffer::new();
        let colors: Vec<u8> = (0..12).collect();
        buf.add_quad(
            [
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            FaceColor::PerVertex(&colors),
        )
        .unwrap();

        let (vertices, got) = buf.data(ShapeKind::Quads);
        assert_eq!(vertices.len(), 12);
        assert_eq!(got, colors.as_slice());
    }

    #[test]
    fn per_vertex_color_length_is_checked() {
        let mut buf = PrimitiveBuffer::new();
        let err = buf
            .add_triangle(
                [[0.0; 3], [0.0; 3], [0.0; 3]],
                FaceColor::PerVertex(&[0, 0, 0, 0]),
            )
            .unwrap_err();
        assert_eq!(err, ScreenError::FaceColorLength { expected: 9, got: 4 });
        assert!(buf.is_empty());
    }

    // ── set ───────────────────────────────────────────────────────────────

    #[test]
    fn set_replaces_previous_contents() {
        let mut buf = PrimitiveBuffer::new();
        buf.add_point(1.0, 1.0, 0.0, RED);
        buf.set_points(vec![9.0, 9.0, 9.0], vec![1, 2, 3]).unwrap();

        let (vertices, colors) = buf.data(ShapeKind::Points);
        assert_eq!(vertices, &[9.0, 9.0, 9.0]);
        assert_eq!(colors, &[1, 2, 3]);
    }

    #[test]
    fn set_line_strip_rejects_mismatch() {
        let mut buf = PrimitiveBuffer::new();
        let err = buf.set_line_strip(vec![0.0; 9], vec![0; 6]).unwrap_err();
        assert_eq!(err, ScreenError::ColorLengthMismatch { vertices: 9, colors: 6 });
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_empties_every_kind() {
        let mut buf = PrimitiveBuffer::new();
        buf.add_point(0.0, 0.0, 0.0, RED);
        buf.add_line([0.0; 3], [1.0; 3], RED);
        buf.set_quads(vec![0.0; 12], vec![0; 12]).unwrap();

        buf.clear();
        assert!(buf.is_empty());
        for kind in ShapeKind::ALL {
            assert_eq!(buf.vertex_count(kind), 0);
        }
    }
}
