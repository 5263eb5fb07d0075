use std::collections::HashMap;

use super::ShapeKind;

/// Handle to one GPU-resident primitive list.
///
/// Minted by a backend at upload time; valid until released. Handles are
/// never shared between screens.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListId(u64);

impl ListId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Upload/release seam between screens and a renderer.
///
/// `vertices` are 3 `f32` per vertex, `colors` 3 `u8` per vertex, already
/// validated by [`PrimitiveBuffer`](super::PrimitiveBuffer). Backends choose
/// the GPU topology via [`ShapeKind::topology`].
pub trait BatchBackend {
    fn upload(&mut self, kind: ShapeKind, vertices: &[f32], colors: &[u8]) -> ListId;

    /// Releases a previously uploaded list. Releasing an unknown handle is a
    /// no-op (screens only release handles they own).
    fn release(&mut self, id: ListId);
}

/// One recorded upload held by a [`RecordingBatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    pub kind: ShapeKind,
    pub vertices: Vec<f32>,
    pub colors: Vec<u8>,
}

/// Headless backend that records uploads instead of touching a GPU.
///
/// Used by the test suite (flush/visibility determinism) and usable by
/// applications that drive screens without a window.
#[derive(Debug, Default)]
pub struct RecordingBatch {
    live: HashMap<u64, UploadRecord>,
    next_id: u64,
    uploads: usize,
    releases: usize,
}

impl RecordingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn releases(&self) -> usize {
        self.releases
    }

    pub fn get(&self, id: ListId) -> Option<&UploadRecord> {
        self.live.get(&id.raw())
    }

    /// Live lists in a deterministic order, for equality comparisons.
    pub fn snapshot(&self) -> Vec<UploadRecord> {
        let mut ids: Vec<u64> = self.live.keys().copied().collect();
        ids.sort_unstable();
        let mut records: Vec<UploadRecord> = ids.iter().map(|id| self.live[id].clone()).collect();
        records.sort_by_key(|r| r.kind.index());
        records
    }
}

impl BatchBackend for RecordingBatch {
    fn upload(&mut self, kind: ShapeKind, vertices: &[f32], colors: &[u8]) -> ListId {
        let id = self.next_id;
        self.next_id += 1;
        self.uploads += 1;
        self.live.insert(
            id,
            UploadRecord {
                kind,
                vertices: vertices.to_vec(),
                colors: colors.to_vec(),
            },
        );
        ListId::from_raw(id)
    }

    fn release(&mut self, id: ListId) {
        if self.live.remove(&id.raw()).is_some() {
            self.releases += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_then_release_round_trip() {
        let mut batch = RecordingBatch::new();
        let id = batch.upload(ShapeKind::Points, &[0.0, 0.0, 0.0], &[1, 2, 3]);

        assert_eq!(batch.live_count(), 1);
        assert_eq!(batch.get(id).unwrap().kind, ShapeKind::Points);

        batch.release(id);
        assert_eq!(batch.live_count(), 0);
        assert_eq!(batch.releases(), 1);
    }

    #[test]
    fn releasing_unknown_handle_is_a_noop() {
        let mut batch = RecordingBatch::new();
        batch.release(ListId::from_raw(42));
        assert_eq!(batch.releases(), 0);
    }
}
