use glam::Mat4;

use crate::batch::{BatchBackend, PrimitiveBuffer, Rgb};
use crate::coords::{Rect, Viewport};
use crate::render::transform::flat_transform;

use super::{BACKGROUND_DEPTH, Screen, ScreenCore};

/// Flat 2D screen: orthographic projection, geometry in screen-local pixels.
///
/// Content comes from the injected render closure, which repopulates the
/// primitive buffer each time the screen renders.
pub struct Screen2D {
    core: ScreenCore,
    render_fn: Box<dyn FnMut(&mut PrimitiveBuffer)>,
}

impl Screen2D {
    pub fn new(
        rect: Rect,
        bg: Rgb,
        render_fn: impl FnMut(&mut PrimitiveBuffer) + 'static,
    ) -> Self {
        Self {
            core: ScreenCore::new(rect, bg),
            render_fn: Box::new(render_fn),
        }
    }
}

impl Screen for Screen2D {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn rebuild_background(&mut self, batch: &mut dyn BatchBackend) {
        let Rect { w, h, .. } = self.core.rect;
        let z = BACKGROUND_DEPTH;
        let vertices = [
            0.0, 0.0, z, //
            w, 0.0, z, //
            w, h, z, //
            0.0, h, z,
        ];
        let colors: Vec<u8> = self.core.bg.repeat(4);
        self.core.lists.set_background(batch, &vertices, &colors);
    }

    fn render(&mut self, batch: &mut dyn BatchBackend) {
        (self.render_fn)(&mut self.core.buffer);
        self.core.flush(batch);
    }

    fn transform(&self, viewport: Viewport) -> Mat4 {
        flat_transform(self.core.rect, viewport)
    }
}
