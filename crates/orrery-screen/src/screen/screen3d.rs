use glam::{Mat4, Vec3};

use crate::batch::{BatchBackend, PrimitiveBuffer, Rgb};
use crate::coords::{Rect, Viewport};
use crate::input::{Key, Modifiers};
use crate::render::transform::perspective_transform;

use super::{Screen, ScreenCore};

/// Degrees added per rotation key press.
const ROTATE_STEP: f32 = 5.0;
/// Units the camera moves along z per dolly key press.
const DOLLY_STEP: f32 = 10.0;
/// Units the camera moves along x/y per truck/pedestal key press.
const TRUCK_STEP: f32 = 2.0;
/// Camera z stays within ±this.
const DOLLY_LIMIT: f32 = 400.0;

/// Half-edge of the background cube framing the scene.
const BG_CUBE: f32 = 900.0;

/// Perspective camera state.
///
/// `rotation` is pitch/yaw/roll in degrees per axis; values are not
/// normalized and may grow unbounded. `offset` is reserved and currently
/// unused by the transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub rotation: Vec3,
    pub offset: Vec3,
}

impl Camera3D {
    #[inline]
    pub const fn new(position: Vec3, rotation: Vec3, offset: Vec3) -> Self {
        Self { position, rotation, offset }
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO)
    }
}

/// Perspective 3D screen.
///
/// Draws with a 60° vertical FOV and a translate-then-rotate model
/// transform: rotation happens about the camera's translated position, not
/// the world origin. Discrete key bindings adjust the camera:
/// arrows pitch/roll, Z/X yaw, S/A dolly (z, clamped), J/L truck (x),
/// I/K pedestal (y).
pub struct Screen3D {
    core: ScreenCore,
    camera: Camera3D,
    render_fn: Box<dyn FnMut(&mut PrimitiveBuffer, &Camera3D)>,
}

impl Screen3D {
    pub fn new(
        rect: Rect,
        camera: Camera3D,
        bg: Rgb,
        render_fn: impl FnMut(&mut PrimitiveBuffer, &Camera3D) + 'static,
    ) -> Self {
        Self {
            core: ScreenCore::new(rect, bg),
            camera,
            render_fn: Box::new(render_fn),
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera3D {
        &mut self.camera
    }
}

impl Screen for Screen3D {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    /// The background is a fixed cube centered at the origin, independent of
    /// the screen rectangle; it frames the scene rather than representing a
    /// world extent.
    fn rebuild_background(&mut self, batch: &mut dyn BatchBackend) {
        const S: f32 = BG_CUBE;
        let faces: [[[f32; 3]; 4]; 6] = [
            [[-S, -S, -S], [S, -S, -S], [S, S, -S], [-S, S, -S]],
            [[-S, -S, -S], [S, -S, -S], [S, -S, S], [-S, -S, S]],
            [[S, -S, -S], [S, S, -S], [S, S, S], [S, -S, S]],
            [[S, S, -S], [-S, S, -S], [-S, S, S], [S, S, S]],
            [[-S, S, -S], [-S, -S, -S], [-S, -S, S], [-S, S, S]],
            [[-S, -S, S], [S, -S, S], [S, S, S], [-S, S, S]],
        ];

        let mut vertices = Vec::with_capacity(6 * 4 * 3);
        for face in &faces {
            for corner in face {
                vertices.extend(corner);
            }
        }
        let colors: Vec<u8> = self.core.bg.repeat(24);
        self.core.lists.set_background(batch, &vertices, &colors);
    }

    fn render(&mut self, batch: &mut dyn BatchBackend) {
        (self.render_fn)(&mut self.core.buffer, &self.camera);
        self.core.flush(batch);
    }

    fn transform(&self, _viewport: Viewport) -> Mat4 {
        perspective_transform(self.core.rect, &self.camera)
    }

    fn key_down(&mut self, key: Key, _modifiers: Modifiers, _batch: &mut dyn BatchBackend) {
        let camera = &mut self.camera;
        match key {
            Key::ArrowLeft => camera.rotation.z += ROTATE_STEP,
            Key::ArrowRight => camera.rotation.z -= ROTATE_STEP,
            Key::ArrowUp => camera.rotation.x += ROTATE_STEP,
            Key::ArrowDown => camera.rotation.x -= ROTATE_STEP,
            Key::X => camera.rotation.y -= ROTATE_STEP,
            Key::Z => camera.rotation.y += ROTATE_STEP,
            Key::S => {
                camera.position.z = (camera.position.z + DOLLY_STEP).min(DOLLY_LIMIT);
            }
            Key::A => {
                camera.position.z = (camera.position.z - DOLLY_STEP).max(-DOLLY_LIMIT);
            }
            Key::J => camera.position.x += TRUCK_STEP,
            Key::L => camera.position.x -= TRUCK_STEP,
            Key::I => camera.position.y -= TRUCK_STEP,
            Key::K => camera.position.y += TRUCK_STEP,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{RecordingBatch, ShapeKind};

    fn screen() -> Screen3D {
        Screen3D::new(
            Rect::new(0.0, 0.0, 400.0, 300.0),
            Camera3D::default(),
            [0, 0, 0],
            |buf, camera| {
                buf.add_point(camera.position.x, 0.0, 0.0, [255, 255, 255]);
            },
        )
    }

    fn press(s: &mut Screen3D, key: Key) {
        let mut batch = RecordingBatch::new();
        s.key_down(key, Modifiers::default(), &mut batch);
    }

    // ── background ────────────────────────────────────────────────────────

    #[test]
    fn background_is_a_24_vertex_cube() {
        let mut batch = RecordingBatch::new();
        let mut s = screen();
        s.rebuild_background(&mut batch);

        let record = batch.get(s.core().lists.background().unwrap()).unwrap();
        assert_eq!(record.kind, ShapeKind::Quads);
        assert_eq!(record.vertices.len(), 24 * 3);
        assert_eq!(record.colors.len(), 24 * 3);
        assert!(record.vertices.iter().all(|v| v.abs() == 900.0));
    }

    // ── key bindings ──────────────────────────────────────────────────────

    #[test]
    fn rotation_keys_step_five_degrees() {
        let mut s = screen();
        press(&mut s, Key::ArrowLeft);
        press(&mut s, Key::ArrowUp);
        press(&mut s, Key::Z);
        assert_eq!(s.camera().rotation, Vec3::new(5.0, 5.0, 5.0));

        press(&mut s, Key::ArrowRight);
        press(&mut s, Key::ArrowRight);
        press(&mut s, Key::ArrowDown);
        press(&mut s, Key::X);
        assert_eq!(s.camera().rotation, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn rotation_is_not_normalized() {
        let mut s = screen();
        for _ in 0..100 {
            press(&mut s, Key::ArrowUp);
        }
        assert_eq!(s.camera().rotation.x, 500.0);
    }

    #[test]
    fn dolly_clamps_at_the_limit() {
        let mut s = screen();
        for _ in 0..50 {
            press(&mut s, Key::S);
        }
        assert_eq!(s.camera().position.z, 400.0);

        for _ in 0..100 {
            press(&mut s, Key::A);
        }
        assert_eq!(s.camera().position.z, -400.0);
    }

    #[test]
    fn truck_and_pedestal_step_two_units() {
        let mut s = screen();
        press(&mut s, Key::J);
        press(&mut s, Key::I);
        assert_eq!(s.camera().position.x, 2.0);
        assert_eq!(s.camera().position.y, -2.0);

        press(&mut s, Key::L);
        press(&mut s, Key::K);
        assert_eq!(s.camera().position.x, 0.0);
        assert_eq!(s.camera().position.y, 0.0);
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn render_sees_the_current_camera() {
        let mut batch = RecordingBatch::new();
        let mut s = screen();
        press(&mut s, Key::J);
        s.render(&mut batch);

        let record = batch.get(s.core().lists.list(ShapeKind::Points).unwrap()).unwrap();
        assert_eq!(record.vertices[0], 2.0);
    }
}
