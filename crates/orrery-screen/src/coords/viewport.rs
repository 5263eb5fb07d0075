/// Window viewport in logical pixels plus the logical→physical scale.
///
/// Screens are laid out in logical pixels; scissor rects are issued in
/// physical pixels, so renderers multiply by `scale_factor` when the window
/// and framebuffer resolutions differ.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        Self { width, height, scale_factor }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.scale_factor > 0.0
            && self.width.is_finite()
            && self.height.is_finite()
            && self.scale_factor.is_finite()
    }

    /// Physical framebuffer size, at least 1×1.
    #[inline]
    pub fn physical(self) -> (u32, u32) {
        (
            (self.width * self.scale_factor).max(1.0) as u32,
            (self.height * self.scale_factor).max(1.0) as u32,
        )
    }
}
