use crate::batch::{BatchBackend, BatchLists, PrimitiveBuffer, Rgb};
use crate::coords::Rect;

/// State shared by every screen variant.
///
/// Invariant: `buffer` holds only primitives added since the last flush;
/// after a flush the buffer is empty and `lists` mirrors the buffer state at
/// flush time exactly (or holds nothing while hidden).
#[derive(Debug)]
pub struct ScreenCore {
    pub rect: Rect,
    pub bg: Rgb,
    pub visible: bool,
    pub active: bool,
    pub buffer: PrimitiveBuffer,
    pub lists: BatchLists,
}

impl ScreenCore {
    pub fn new(rect: Rect, bg: Rgb) -> Self {
        Self {
            rect,
            bg,
            visible: true,
            active: true,
            buffer: PrimitiveBuffer::new(),
            lists: BatchLists::new(),
        }
    }

    /// Uploads the buffered primitives and clears the buffer.
    ///
    /// The last call inside any render; never overridden.
    pub fn flush(&mut self, batch: &mut dyn BatchBackend) {
        let visible = self.visible;
        self.lists.flush(&mut self.buffer, visible, batch);
    }

    pub fn set_pos(&mut self, x: f32, y: f32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.rect.w = width;
        self.rect.h = height;
    }
}
