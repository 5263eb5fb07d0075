//! Drawable screens.
//!
//! Responsibilities:
//! - shared lifecycle: visibility/activity state machine, flush, hit-testing
//! - per-variant projection and background geometry
//! - mapping input hooks to view transforms (pan, zoom, camera)
//!
//! A screen's content comes from an injected render closure: it repopulates
//! the [`PrimitiveBuffer`](crate::batch::PrimitiveBuffer) and the screen
//! flushes afterwards. Hooks that change the view re-run the closure so the
//! visible geometry matches the new view immediately.

mod core;
mod graph;
mod screen2d;
mod screen3d;
mod view;

use glam::Mat4;

pub use self::core::ScreenCore;
pub use graph::GraphScreen;
pub use screen2d::Screen2D;
pub use screen3d::{Camera3D, Screen3D};
pub use view::GraphView;

use crate::batch::{BatchBackend, ListId, ShapeKind};
use crate::coords::Viewport;
use crate::input::{Key, Modifiers, MouseButton};
use crate::render::transform::scissor_rect;

/// Depth at which background geometry is placed, behind all content.
pub const BACKGROUND_DEPTH: f32 = -100.0;

/// Snapshot of everything the renderer needs for one screen's batched draw:
/// the projection/model transform, the physical-pixel scissor rect, and the
/// current GPU list handles. Producing it mutates nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenDraw {
    pub transform: Mat4,
    pub scissor: (u32, u32, u32, u32),
    pub background: Option<ListId>,
    pub kinds: [Option<ListId>; ShapeKind::COUNT],
}

/// Screen contract: lifecycle plus overridable input hooks.
///
/// The owning window/container routes events here. `is_inside` takes window
/// coordinates for hit-testing; the pointer hooks receive screen-local
/// coordinates (the container translates after hit-testing). The container
/// calls `tick` only while the screen is active.
pub trait Screen {
    fn core(&self) -> &ScreenCore;
    fn core_mut(&mut self) -> &mut ScreenCore;

    /// Rebuilds the background list for the current screen state.
    fn rebuild_background(&mut self, batch: &mut dyn BatchBackend);

    /// Repopulates the primitive buffer and flushes it to the batch.
    fn render(&mut self, batch: &mut dyn BatchBackend);

    /// Projection + model transform applied to this screen's lists.
    fn transform(&self, viewport: Viewport) -> Mat4;

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Shows or hides the screen.
    ///
    /// Showing re-renders and rebuilds the background so the screen reflects
    /// current state rather than stale geometry. Hiding releases every held
    /// GPU handle; CPU-side buffers are left for the next flush to clear.
    fn set_visible(&mut self, visible: bool, batch: &mut dyn BatchBackend) {
        self.core_mut().visible = visible;
        if visible {
            self.render(batch);
            self.rebuild_background(batch);
        } else {
            self.core_mut().lists.release_all(batch);
        }
    }

    /// Gates whether the owning loop calls [`tick`](Self::tick).
    fn set_active(&mut self, active: bool) {
        self.core_mut().active = active;
    }

    fn on(&mut self, batch: &mut dyn BatchBackend) {
        self.set_active(true);
        self.set_visible(true, batch);
    }

    fn off(&mut self, batch: &mut dyn BatchBackend) {
        self.set_active(false);
        self.set_visible(false, batch);
    }

    /// Half-open containment test in window coordinates.
    fn is_inside(&self, x: f32, y: f32) -> bool {
        self.core().rect.contains(x, y)
    }

    /// Geometry update on a window resize. Override to reposition.
    fn resize(&mut self, width: f32, height: f32) {
        let _ = (width, height);
    }

    /// Resize entry point: geometry update followed by a background rebuild
    /// (the background extent depends on the size).
    fn on_resize(&mut self, width: f32, height: f32, batch: &mut dyn BatchBackend) {
        self.resize(width, height);
        self.rebuild_background(batch);
    }

    /// Draw submission snapshot, or `None` when hidden or fully clipped.
    fn draw_setup(&self, viewport: Viewport) -> Option<ScreenDraw> {
        let core = self.core();
        if !core.visible {
            return None;
        }
        let scissor = scissor_rect(core.rect, viewport)?;
        Some(ScreenDraw {
            transform: self.transform(viewport),
            scissor,
            background: core.lists.background(),
            kinds: core.lists.kinds(),
        })
    }

    // ── input hooks ───────────────────────────────────────────────────────

    fn mouse_move(&mut self, x: f32, y: f32, dx: f32, dy: f32) {
        let _ = (x, y, dx, dy);
    }

    fn mouse_drag(
        &mut self,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
        button: MouseButton,
        modifiers: Modifiers,
    ) {
        let _ = (x, y, dx, dy, button, modifiers);
    }

    fn mouse_down(&mut self, x: f32, y: f32, button: MouseButton, modifiers: Modifiers) {
        let _ = (x, y, button, modifiers);
    }

    fn mouse_up(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        modifiers: Modifiers,
        batch: &mut dyn BatchBackend,
    ) {
        let _ = (x, y, button, modifiers, batch);
    }

    fn key_down(&mut self, key: Key, modifiers: Modifiers, batch: &mut dyn BatchBackend) {
        let _ = (key, modifiers, batch);
    }

    fn key_up(&mut self, key: Key, modifiers: Modifiers) {
        let _ = (key, modifiers);
    }

    /// Per-frame update, called by the owning loop while active.
    fn tick(&mut self, dt: f32) {
        let _ = dt;
    }
}
