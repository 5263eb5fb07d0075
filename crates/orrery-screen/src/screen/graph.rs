use glam::Mat4;

use crate::batch::{BatchBackend, PrimitiveBuffer, Rgb};
use crate::coords::{Rect, Viewport};
use crate::error::ScreenError;
use crate::input::{Key, Modifiers, MouseButton};
use crate::render::transform::graph_transform;
use crate::value::ScalarHandle;

use super::{BACKGROUND_DEPTH, GraphView, Screen, ScreenCore};

/// Zoomable graph screen.
///
/// Wraps a [`GraphView`] with the input wiring: left release zooms in at the
/// cursor, right release zooms out, middle-drag pans, arrow keys nudge by a
/// fifth of the extent. Every view change rebuilds the background and
/// re-renders so the visible geometry matches the new view immediately.
///
/// The zoom ratio is read through an injected [`ScalarHandle`], typically
/// registered in the container's [`ValueSet`](crate::value::ValueSet).
pub struct GraphScreen {
    core: ScreenCore,
    view: GraphView,
    zoom_ratio: ScalarHandle,
    drag_from: Option<(f64, f64)>,
    drag_offset: (f64, f64),
    render_fn: Box<dyn FnMut(&mut PrimitiveBuffer, &GraphView)>,
}

impl GraphScreen {
    /// Creates a graph screen with its view centered at (gx, gy) spanning
    /// gw×gh world units.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rect: Rect,
        gx: f64,
        gy: f64,
        gw: f64,
        gh: f64,
        zoom_ratio: ScalarHandle,
        bg: Rgb,
        render_fn: impl FnMut(&mut PrimitiveBuffer, &GraphView) + 'static,
    ) -> Result<Self, ScreenError> {
        let view = GraphView::new(gx, gy, gw, gh, rect.w as f64, rect.h as f64)?;
        Ok(Self {
            core: ScreenCore::new(rect, bg),
            view,
            zoom_ratio,
            drag_from: None,
            drag_offset: (0.0, 0.0),
            render_fn: Box::new(render_fn),
        })
    }

    #[inline]
    pub fn view(&self) -> &GraphView {
        &self.view
    }

    /// Direct view access. Callers mutating through this are responsible for
    /// rebuilding the background and re-rendering afterwards.
    #[inline]
    pub fn view_mut(&mut self) -> &mut GraphView {
        &mut self.view
    }

    /// Live pixel offset of an in-progress middle-button drag, for visual
    /// feedback. Zero outside a drag; never applied to the view center.
    #[inline]
    pub fn drag_offset(&self) -> (f64, f64) {
        self.drag_offset
    }

    /// Zooms in at a screen-local point using the configured ratio, then
    /// rebuilds and re-renders.
    pub fn zoom_in(&mut self, sx: f64, sy: f64, batch: &mut dyn BatchBackend) {
        let ratio = self.zoom_ratio.get();
        if let Err(err) = self.view.zoom_in_at(sx, sy, ratio) {
            log::warn!("zoom in skipped: {err}");
            return;
        }
        self.rebuild_background(batch);
        self.render(batch);
    }

    /// Zooms out at a screen-local point using the configured ratio, then
    /// rebuilds and re-renders.
    pub fn zoom_out(&mut self, sx: f64, sy: f64, batch: &mut dyn BatchBackend) {
        let ratio = self.zoom_ratio.get();
        if let Err(err) = self.view.zoom_out_at(sx, sy, ratio) {
            log::warn!("zoom out skipped: {err}");
            return;
        }
        self.rebuild_background(batch);
        self.render(batch);
    }

    /// Restores the original view without re-rendering.
    pub fn reset_graph(&mut self) {
        self.view.reset();
    }

    /// Restores the original view, rebuilds the background and re-renders.
    pub fn reset_screen(&mut self, batch: &mut dyn BatchBackend) {
        self.reset_graph();
        self.rebuild_background(batch);
        self.render(batch);
    }

    /// Refits screen and view to new dimensions, preserving
    /// pixels-per-world-unit.
    pub fn refit(&mut self, width: f32, height: f32) -> Result<(), ScreenError> {
        self.view.refit(width as f64, height as f64)?;
        self.core.set_size(width, height);
        Ok(())
    }

    fn commit_drag(&mut self, sx: f64, sy: f64) {
        let Some((fx, fy)) = self.drag_from.take() else {
            return;
        };
        match (self.view.on_plot(fx, fy), self.view.on_plot(sx, sy)) {
            (Ok((wx1, wy1)), Ok((wx2, wy2))) => {
                self.view.shift_center(wx1 - wx2, wy1 - wy2);
            }
            _ => log::warn!("drag pan skipped: degenerate view extent"),
        }
        self.drag_offset = (0.0, 0.0);
    }
}

impl Screen for GraphScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn rebuild_background(&mut self, batch: &mut dyn BatchBackend) {
        let (min_gx, max_gx, min_gy, max_gy) = self.view.bounds();
        let (min_gx, max_gx) = (min_gx as f32, max_gx as f32);
        let (min_gy, max_gy) = (min_gy as f32, max_gy as f32);
        let z = BACKGROUND_DEPTH;
        let vertices = [
            min_gx, min_gy, z, //
            max_gx, min_gy, z, //
            max_gx, max_gy, z, //
            min_gx, max_gy, z,
        ];
        let colors: Vec<u8> = self.core.bg.repeat(4);
        self.core.lists.set_background(batch, &vertices, &colors);
    }

    fn render(&mut self, batch: &mut dyn BatchBackend) {
        (self.render_fn)(&mut self.core.buffer, &self.view);
        self.core.flush(batch);
    }

    fn transform(&self, viewport: Viewport) -> Mat4 {
        graph_transform(self.core.rect, viewport, &self.view)
    }

    /// Refits to the new dimensions, keeping the world density stable across
    /// the resize.
    fn resize(&mut self, width: f32, height: f32) {
        if let Err(err) = self.refit(width, height) {
            log::warn!("refit skipped: {err}");
        }
    }

    fn mouse_down(&mut self, x: f32, y: f32, button: MouseButton, _modifiers: Modifiers) {
        if button == MouseButton::Middle {
            self.drag_from = Some((x as f64, y as f64));
            self.drag_offset = (0.0, 0.0);
        }
    }

    fn mouse_drag(
        &mut self,
        x: f32,
        y: f32,
        _dx: f32,
        _dy: f32,
        _button: MouseButton,
        _modifiers: Modifiers,
    ) {
        if let Some((fx, fy)) = self.drag_from {
            self.drag_offset = (x as f64 - fx, y as f64 - fy);
        }
    }

    fn mouse_up(
        &mut self,
        x: f32,
        y: f32,
        button: MouseButton,
        _modifiers: Modifiers,
        batch: &mut dyn BatchBackend,
    ) {
        match button {
            MouseButton::Left => {
                let ratio = self.zoom_ratio.get();
                if let Err(err) = self.view.zoom_in_at(x as f64, y as f64, ratio) {
                    log::warn!("zoom in skipped: {err}");
                }
            }
            MouseButton::Right => {
                let ratio = self.zoom_ratio.get();
                if let Err(err) = self.view.zoom_out_at(x as f64, y as f64, ratio) {
                    log::warn!("zoom out skipped: {err}");
                }
            }
            MouseButton::Middle => self.commit_drag(x as f64, y as f64),
            _ => {}
        }
        self.rebuild_background(batch);
        self.render(batch);
    }

    fn key_down(&mut self, key: Key, _modifiers: Modifiers, batch: &mut dyn BatchBackend) {
        match key {
            Key::ArrowUp => self.view.nudge_up(),
            Key::ArrowDown => self.view.nudge_down(),
            Key::ArrowLeft => self.view.nudge_left(),
            Key::ArrowRight => self.view.nudge_right(),
            _ => return,
        }
        self.rebuild_background(batch);
        self.render(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{RecordingBatch, ShapeKind};

    fn screen(ratio: f64) -> (GraphScreen, RecordingBatch) {
        let s = GraphScreen::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            0.0,
            0.0,
            10.0,
            10.0,
            ScalarHandle::detached(ratio),
            [255, 255, 255],
            |buf, view| {
                let (min_gx, max_gx, ..) = view.bounds();
                buf.add_point(min_gx as f32, 0.0, 0.0, [0, 0, 0]);
                buf.add_point(max_gx as f32, 0.0, 0.0, [0, 0, 0]);
            },
        )
        .unwrap();
        (s, RecordingBatch::new())
    }

    // ── zoom ──────────────────────────────────────────────────────────────

    #[test]
    fn left_release_zooms_in_at_cursor() {
        let (mut s, mut batch) = screen(0.5);
        s.mouse_up(50.0, 50.0, MouseButton::Left, Modifiers::default(), &mut batch);

        assert_eq!(s.view().center(), (0.0, 0.0));
        assert_eq!(s.view().extent(), (5.0, 5.0));
        assert_eq!(s.view().total_zoom(), 4.0);
    }

    #[test]
    fn right_release_zooms_out() {
        let (mut s, mut batch) = screen(0.5);
        s.mouse_up(50.0, 50.0, MouseButton::Right, Modifiers::default(), &mut batch);

        assert_eq!(s.view().extent(), (20.0, 20.0));
        assert_eq!(s.view().total_zoom(), 0.25);
    }

    #[test]
    fn zoom_rerenders_with_the_new_view() {
        let (mut s, mut batch) = screen(0.5);
        s.on(&mut batch);

        s.mouse_up(50.0, 50.0, MouseButton::Left, Modifiers::default(), &mut batch);

        // The point list was rebuilt from the zoomed bounds.
        let id = s.core().lists.list(ShapeKind::Points).unwrap();
        let record = batch.get(id).unwrap();
        assert_eq!(record.vertices[0], -2.5);
        assert_eq!(record.vertices[3], 2.5);
        // The background quad follows the new bounds too.
        let bg = batch.get(s.core().lists.background().unwrap()).unwrap();
        assert_eq!(&bg.vertices[0..2], &[-2.5, -2.5]);
    }

    #[test]
    fn invalid_zoom_ratio_leaves_view_untouched() {
        let (mut s, mut batch) = screen(0.0);
        s.mouse_up(50.0, 50.0, MouseButton::Left, Modifiers::default(), &mut batch);

        assert_eq!(s.view().extent(), (10.0, 10.0));
        assert_eq!(s.view().total_zoom(), 1.0);
    }

    // ── drag pan ──────────────────────────────────────────────────────────

    #[test]
    fn middle_drag_pans_by_world_delta() {
        let (mut s, mut batch) = screen(0.5);
        let mods = Modifiers::default();

        s.mouse_down(50.0, 50.0, MouseButton::Middle, mods);
        s.mouse_drag(60.0, 70.0, 10.0, 20.0, MouseButton::Middle, mods);
        assert_eq!(s.drag_offset(), (10.0, 20.0));

        s.mouse_up(60.0, 70.0, MouseButton::Middle, mods, &mut batch);
        // 10 px right, 20 px up at 10 world units / 100 px.
        assert_eq!(s.view().center(), (-1.0, -2.0));
        assert_eq!(s.drag_offset(), (0.0, 0.0));
    }

    #[test]
    fn drag_needs_a_middle_press_first() {
        let (mut s, mut batch) = screen(0.5);
        let mods = Modifiers::default();

        s.mouse_drag(60.0, 70.0, 10.0, 20.0, MouseButton::Middle, mods);
        assert_eq!(s.drag_offset(), (0.0, 0.0));

        s.mouse_down(0.0, 0.0, MouseButton::Left, mods);
        s.mouse_up(10.0, 10.0, MouseButton::Middle, mods, &mut batch);
        assert_eq!(s.view().center(), (0.0, 0.0));
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn arrow_keys_nudge_the_view() {
        let (mut s, mut batch) = screen(0.5);
        let mods = Modifiers::default();

        s.key_down(Key::ArrowUp, mods, &mut batch);
        s.key_down(Key::ArrowRight, mods, &mut batch);
        assert_eq!(s.view().center(), (2.0, 2.0));

        s.key_down(Key::A, mods, &mut batch);
        assert_eq!(s.view().center(), (2.0, 2.0));
    }

    // ── reset / resize ────────────────────────────────────────────────────

    #[test]
    fn reset_screen_restores_and_rerenders() {
        let (mut s, mut batch) = screen(0.5);
        s.on(&mut batch);
        s.mouse_up(80.0, 20.0, MouseButton::Left, Modifiers::default(), &mut batch);

        s.reset_screen(&mut batch);
        assert_eq!(s.view().center(), (0.0, 0.0));
        assert_eq!(s.view().extent(), (10.0, 10.0));
        assert_eq!(s.view().total_zoom(), 1.0);

        let bg = batch.get(s.core().lists.background().unwrap()).unwrap();
        assert_eq!(&bg.vertices[0..2], &[-5.0, -5.0]);
    }

    #[test]
    fn resize_refits_width_and_height_independently() {
        let (mut s, mut batch) = screen(0.5);
        s.on_resize(200.0, 50.0, &mut batch);

        assert_eq!(s.view().extent(), (20.0, 5.0));
        assert_eq!(s.core().rect.w, 200.0);
        assert_eq!(s.core().rect.h, 50.0);
    }
}
