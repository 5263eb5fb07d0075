/// Shape kinds a screen can batch.
///
/// The set is closed: buffers and handle tables are fixed-size arrays indexed
/// by [`ShapeKind::index`], so "exactly one buffer per kind" holds
/// structurally.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    Points,
    Lines,
    LineStrip,
    Triangles,
    Quads,
}

/// GPU primitive topology a kind's vertices are drawn with.
///
/// Modern pipelines have no quad topology; [`ShapeKind::Quads`] draws as a
/// triangle list with a 0-1-2 / 0-2-3 index expansion per quad, preserving
/// the 4-vertex consistent-winding contract at the API surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
}

impl ShapeKind {
    pub const COUNT: usize = 5;

    pub const ALL: [ShapeKind; Self::COUNT] = [
        ShapeKind::Points,
        ShapeKind::Lines,
        ShapeKind::LineStrip,
        ShapeKind::Triangles,
        ShapeKind::Quads,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ShapeKind::Points => 0,
            ShapeKind::Lines => 1,
            ShapeKind::LineStrip => 2,
            ShapeKind::Triangles => 3,
            ShapeKind::Quads => 4,
        }
    }

    #[inline]
    pub const fn topology(self) -> Topology {
        match self {
            ShapeKind::Points => Topology::PointList,
            ShapeKind::Lines => Topology::LineList,
            ShapeKind::LineStrip => Topology::LineStrip,
            ShapeKind::Triangles | ShapeKind::Quads => Topology::TriangleList,
        }
    }

    /// Whether uploads of this kind carry an index buffer.
    #[inline]
    pub const fn indexed(self) -> bool {
        matches!(self, ShapeKind::Quads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_unique() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn topology_contract() {
        assert_eq!(ShapeKind::Points.topology(), Topology::PointList);
        assert_eq!(ShapeKind::Lines.topology(), Topology::LineList);
        assert_eq!(ShapeKind::LineStrip.topology(), Topology::LineStrip);
        assert_eq!(ShapeKind::Triangles.topology(), Topology::TriangleList);
        assert_eq!(ShapeKind::Quads.topology(), Topology::TriangleList);
        assert!(ShapeKind::Quads.indexed());
        assert!(!ShapeKind::Triangles.indexed());
    }
}
