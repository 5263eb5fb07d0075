//! Projection and model transform builders.
//!
//! All three screen variants reduce to a single matrix handed to the batch
//! shader, plus a physical-pixel scissor rect matching the screen rectangle.

use glam::{Mat4, Vec3};

use crate::coords::{Rect, Viewport};
use crate::screen::{Camera3D, GraphView};

/// Orthographic depth half-range for 2D screens; background geometry at
/// [`BACKGROUND_DEPTH`](crate::screen::BACKGROUND_DEPTH) must stay inside it.
const ORTHO_DEPTH: f32 = 101.0;

const FOV_Y_DEGREES: f32 = 60.0;
const NEAR_3D: f32 = 0.01;
const FAR_3D: f32 = 5000.0;

fn window_ortho(viewport: Viewport) -> Mat4 {
    Mat4::orthographic_rh(
        0.0,
        viewport.width,
        0.0,
        viewport.height,
        -ORTHO_DEPTH,
        ORTHO_DEPTH,
    )
}

/// Flat 2D transform: window ortho, geometry offset to the screen origin.
pub fn flat_transform(rect: Rect, viewport: Viewport) -> Mat4 {
    window_ortho(viewport) * Mat4::from_translation(Vec3::new(rect.x, rect.y, 0.0))
}

/// Graph transform: window ortho, then the world→screen affine mapping so
/// the view center lands at the screen rect's center with
/// `w/gw` × `h/gh` pixels per world unit.
pub fn graph_transform(rect: Rect, viewport: Viewport, view: &GraphView) -> Mat4 {
    let (gx, gy) = view.center();
    let (gw, gh) = view.extent();

    let sx = rect.w as f64 / gw;
    let sy = rect.h as f64 / gh;
    let tx = rect.x as f64 + rect.w as f64 / 2.0 - gx * sx;
    let ty = rect.y as f64 + rect.h as f64 / 2.0 - gy * sy;

    window_ortho(viewport)
        * Mat4::from_translation(Vec3::new(tx as f32, ty as f32, 0.0))
        * Mat4::from_scale(Vec3::new(sx as f32, sy as f32, 1.0))
}

/// Perspective transform: 60° vertical FOV, then translate by the camera
/// position, then pitch/yaw/roll. Rotation is about the translated origin,
/// not the world origin.
pub fn perspective_transform(rect: Rect, camera: &Camera3D) -> Mat4 {
    let aspect = if rect.h > 0.0 { rect.w / rect.h } else { 1.0 };

    Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, NEAR_3D, FAR_3D)
        * Mat4::from_translation(camera.position)
        * Mat4::from_rotation_x(camera.rotation.x.to_radians())
        * Mat4::from_rotation_y(camera.rotation.y.to_radians())
        * Mat4::from_rotation_z(camera.rotation.z.to_radians())
}

/// Physical-pixel scissor rect for a screen rectangle, or `None` when the
/// clipped area is empty.
///
/// Screens use a bottom-left origin; the framebuffer scissor origin is
/// top-left, so y is flipped here.
pub fn scissor_rect(rect: Rect, viewport: Viewport) -> Option<(u32, u32, u32, u32)> {
    let (phys_w, phys_h) = viewport.physical();
    let scale = viewport.scale_factor;

    let x0 = ((rect.x * scale).max(0.0) as u32).min(phys_w);
    let x1 = (((rect.x + rect.w) * scale).max(0.0) as u32).min(phys_w);
    let y0 = (((viewport.height - rect.y - rect.h) * scale).max(0.0) as u32).min(phys_h);
    let y1 = (((viewport.height - rect.y) * scale).max(0.0) as u32).min(phys_h);

    let w = x1.saturating_sub(x0);
    let h = y1.saturating_sub(y0);
    if w == 0 || h == 0 { None } else { Some((x0, y0, w, h)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    // ── flat ──────────────────────────────────────────────────────────────

    #[test]
    fn flat_transform_offsets_to_the_screen_origin() {
        let m = flat_transform(
            Rect::new(10.0, 20.0, 50.0, 50.0),
            Viewport::new(100.0, 100.0, 1.0),
        );
        // Screen-local (0, 0) lands at window (10, 20) → NDC (-0.8, -0.6).
        let p = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_close(p.x, -0.8);
        assert_close(p.y, -0.6);
    }

    // ── graph ─────────────────────────────────────────────────────────────

    #[test]
    fn graph_transform_maps_view_center_to_rect_center() {
        let view = GraphView::new(3.0, -2.0, 10.0, 10.0, 100.0, 100.0).unwrap();
        let m = graph_transform(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Viewport::new(200.0, 200.0, 1.0),
            &view,
        );
        // The world center must land at window (50, 50) → NDC (-0.5, -0.5).
        let p = m * Vec4::new(3.0, -2.0, 0.0, 1.0);
        assert_close(p.x, -0.5);
        assert_close(p.y, -0.5);
    }

    #[test]
    fn graph_transform_matches_on_screen_mapping() {
        let view = GraphView::new(1.5, 0.5, 4.0, 8.0, 200.0, 100.0).unwrap();
        let rect = Rect::new(20.0, 10.0, 200.0, 100.0);
        let viewport = Viewport::new(400.0, 300.0, 1.0);
        let m = graph_transform(rect, viewport, &view);

        let (wx, wy) = (2.25, -1.75);
        let (sx, sy) = view.on_screen(wx, wy).unwrap();

        let p = m * Vec4::new(wx as f32, wy as f32, 0.0, 1.0);
        // Expected NDC from the window position of the mapped point.
        let expected_x = (rect.x + sx as f32) / viewport.width * 2.0 - 1.0;
        let expected_y = (rect.y + sy as f32) / viewport.height * 2.0 - 1.0;
        assert_close(p.x, expected_x);
        assert_close(p.y, expected_y);
    }

    // ── perspective ───────────────────────────────────────────────────────

    #[test]
    fn perspective_translates_before_rotating() {
        let camera = Camera3D::new(
            glam::Vec3::new(0.0, 0.0, -10.0),
            glam::Vec3::new(0.0, 90.0, 0.0),
            glam::Vec3::ZERO,
        );
        let m = perspective_transform(Rect::new(0.0, 0.0, 100.0, 100.0), &camera);

        // A point on +x rotates onto -z, then the translation pushes it
        // further away; it stays centered horizontally after projection.
        let p = m * Vec4::new(5.0, 0.0, 0.0, 1.0);
        let ndc_x = p.x / p.w;
        assert_close(ndc_x, 0.0);
        assert!(p.w > 10.0);
    }

    // ── scissor ───────────────────────────────────────────────────────────

    #[test]
    fn scissor_flips_to_top_left_origin_and_scales() {
        // Bottom-left screen quarter of a 100×100 window at 2× scale.
        let s = scissor_rect(
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Viewport::new(100.0, 100.0, 2.0),
        );
        assert_eq!(s, Some((0, 100, 100, 100)));
    }

    #[test]
    fn scissor_clamps_to_the_viewport() {
        let s = scissor_rect(
            Rect::new(80.0, 80.0, 50.0, 50.0),
            Viewport::new(100.0, 100.0, 1.0),
        );
        assert_eq!(s, Some((80, 0, 20, 20)));
    }

    #[test]
    fn scissor_empty_when_fully_outside() {
        let s = scissor_rect(
            Rect::new(200.0, 0.0, 50.0, 50.0),
            Viewport::new(100.0, 100.0, 1.0),
        );
        assert_eq!(s, None);
    }
}
