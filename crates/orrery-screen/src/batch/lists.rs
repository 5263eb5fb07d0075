use super::{BatchBackend, ListId, PrimitiveBuffer, ShapeKind};

/// The GPU-resident list handles one screen currently holds: one optional
/// list per shape kind plus the background quad list.
///
/// Handle lifetime is strictly scoped to one flush cycle: the previous
/// handle is released before (or in place of) allocating the next.
#[derive(Debug, Default)]
pub struct BatchLists {
    background: Option<ListId>,
    kinds: [Option<ListId>; ShapeKind::COUNT],
}

impl BatchLists {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn background(&self) -> Option<ListId> {
        self.background
    }

    #[inline]
    pub fn list(&self, kind: ShapeKind) -> Option<ListId> {
        self.kinds[kind.index()]
    }

    /// Handles in kind order, for a draw submission.
    #[inline]
    pub fn kinds(&self) -> [Option<ListId>; ShapeKind::COUNT] {
        self.kinds
    }

    /// The flush protocol.
    ///
    /// Per kind: release the previous handle, then upload the buffered
    /// arrays as a new list (only if `visible` and the buffered array is
    /// non-empty). Afterwards the buffer is cleared for every kind
    /// regardless of visibility.
    pub fn flush(
        &mut self,
        buffer: &mut PrimitiveBuffer,
        visible: bool,
        batch: &mut dyn BatchBackend,
    ) {
        let mut uploaded = 0usize;
        for kind in ShapeKind::ALL {
            if let Some(id) = self.kinds[kind.index()].take() {
                batch.release(id);
            }
            if !visible {
                continue;
            }

            let (vertices, colors) = buffer.data(kind);
            if vertices.is_empty() {
                continue;
            }
            self.kinds[kind.index()] = Some(batch.upload(kind, vertices, colors));
            uploaded += 1;
        }

        buffer.clear();
        log::trace!("flush: {uploaded} lists uploaded (visible: {visible})");
    }

    /// Replaces the background list with freshly uploaded quad geometry.
    pub fn set_background(
        &mut self,
        batch: &mut dyn BatchBackend,
        vertices: &[f32],
        colors: &[u8],
    ) {
        if let Some(id) = self.background.take() {
            batch.release(id);
        }
        self.background = Some(batch.upload(ShapeKind::Quads, vertices, colors));
    }

    /// Releases every held handle (background included). CPU-side buffers are
    /// untouched; they are cleared by the next flush, not here.
    pub fn release_all(&mut self, batch: &mut dyn BatchBackend) {
        if let Some(id) = self.background.take() {
            batch.release(id);
        }
        for slot in &mut self.kinds {
            if let Some(id) = slot.take() {
                batch.release(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::RecordingBatch;

    fn buffer_with_points() -> PrimitiveBuffer {
        let mut buf = PrimitiveBuffer::new();
        buf.add_point(1.0, 2.0, 0.0, [10, 20, 30]);
        buf
    }

    // ── flush ─────────────────────────────────────────────────────────────

    #[test]
    fn flush_uploads_non_empty_kinds_only() {
        let mut batch = RecordingBatch::new();
        let mut lists = BatchLists::new();
        let mut buf = buffer_with_points();
        buf.add_line([0.0; 3], [1.0; 3], [0, 0, 0]);

        lists.flush(&mut buf, true, &mut batch);

        assert!(lists.list(ShapeKind::Points).is_some());
        assert!(lists.list(ShapeKind::Lines).is_some());
        assert!(lists.list(ShapeKind::Triangles).is_none());
        assert_eq!(batch.live_count(), 2);
        assert!(buf.is_empty());
    }

    #[test]
    fn flush_with_empty_buffers_is_idempotent() {
        let mut batch = RecordingBatch::new();
        let mut lists = BatchLists::new();
        let mut buf = PrimitiveBuffer::new();

        assert!(buf.is_empty());
        lists.flush(&mut buf, true, &mut batch);

        assert_eq!(batch.live_count(), 0);
        assert!(buf.is_empty());
        for kind in ShapeKind::ALL {
            assert!(lists.list(kind).is_none());
        }
    }

    #[test]
    fn flush_releases_previous_handles() {
        let mut batch = RecordingBatch::new();
        let mut lists = BatchLists::new();

        let mut buf = buffer_with_points();
        lists.flush(&mut buf, true, &mut batch);
        let first = lists.list(ShapeKind::Points).unwrap();

        let mut buf = buffer_with_points();
        lists.flush(&mut buf, true, &mut batch);
        let second = lists.list(ShapeKind::Points).unwrap();

        assert_ne!(first, second);
        assert_eq!(batch.live_count(), 1);
        assert_eq!(batch.releases(), 1);
    }

    #[test]
    fn flush_invisible_skips_upload_but_clears() {
        let mut batch = RecordingBatch::new();
        let mut lists = BatchLists::new();
        let mut buf = buffer_with_points();

        lists.flush(&mut buf, false, &mut batch);

        assert_eq!(batch.live_count(), 0);
        assert!(buf.is_empty());
        assert!(lists.list(ShapeKind::Points).is_none());
    }

    // ── background ────────────────────────────────────────────────────────

    #[test]
    fn set_background_replaces_previous_list() {
        let mut batch = RecordingBatch::new();
        let mut lists = BatchLists::new();

        lists.set_background(&mut batch, &[0.0; 12], &[0; 12]);
        let first = lists.background().unwrap();
        lists.set_background(&mut batch, &[1.0; 12], &[1; 12]);
        let second = lists.background().unwrap();

        assert_ne!(first, second);
        assert_eq!(batch.live_count(), 1);
    }

    #[test]
    fn release_all_clears_everything() {
        let mut batch = RecordingBatch::new();
        let mut lists = BatchLists::new();
        let mut buf = buffer_with_points();

        lists.set_background(&mut batch, &[0.0; 12], &[0; 12]);
        lists.flush(&mut buf, true, &mut batch);
        assert_eq!(batch.live_count(), 2);

        lists.release_all(&mut batch);
        assert_eq!(batch.live_count(), 0);
        assert!(lists.background().is_none());
        for kind in ShapeKind::ALL {
            assert!(lists.list(kind).is_none());
        }
    }
}
