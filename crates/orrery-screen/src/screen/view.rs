use crate::error::ScreenError;

/// World↔screen view state of a zoomable graph.
///
/// The view is a world-space center plus extents; the derived bounds are
/// recomputed immediately after every mutation, never read stale. Math is
/// f64 throughout so deep zooms keep precision; geometry is narrowed to f32
/// only at upload time.
///
/// `total_zoom` is an area-scaling factor relative to the original extent:
/// zooming in at ratio r multiplies it by `(1/r)²`. A resize (`refit`)
/// preserves pixels-per-world-unit and leaves `total_zoom` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphView {
    gx: f64,
    gy: f64,
    gw: f64,
    gh: f64,

    min_gx: f64,
    max_gx: f64,
    min_gy: f64,
    max_gy: f64,

    total_zoom: f64,

    // stored reset view
    ogx: f64,
    ogy: f64,
    ogw: f64,
    ogh: f64,

    // current and original screen dimensions (pixels)
    sw: f64,
    sh: f64,
    ow: f64,
    oh: f64,
}

fn positive_finite(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl GraphView {
    /// Creates a view centered at (gx, gy) spanning gw×gh world units over a
    /// screen_w×screen_h pixel screen. Extents and screen dimensions must be
    /// positive and finite.
    pub fn new(
        gx: f64,
        gy: f64,
        gw: f64,
        gh: f64,
        screen_w: f64,
        screen_h: f64,
    ) -> Result<Self, ScreenError> {
        if !positive_finite(gw) || !positive_finite(gh) {
            return Err(ScreenError::DegenerateExtent { gw, gh });
        }
        if !positive_finite(screen_w) || !positive_finite(screen_h) {
            return Err(ScreenError::DegenerateExtent { gw: screen_w, gh: screen_h });
        }

        let mut view = Self {
            gx,
            gy,
            gw,
            gh,
            min_gx: 0.0,
            max_gx: 0.0,
            min_gy: 0.0,
            max_gy: 0.0,
            total_zoom: 1.0,
            ogx: gx,
            ogy: gy,
            ogw: gw,
            ogh: gh,
            sw: screen_w,
            sh: screen_h,
            ow: screen_w,
            oh: screen_h,
        };
        view.set_minmax();
        Ok(view)
    }

    fn set_minmax(&mut self) {
        self.min_gx = self.gx - self.gw / 2.0;
        self.max_gx = self.gx + self.gw / 2.0;
        self.min_gy = self.gy - self.gh / 2.0;
        self.max_gy = self.gy + self.gh / 2.0;
    }

    fn check_extent(&self) -> Result<(), ScreenError> {
        if !positive_finite(self.gw) || !positive_finite(self.gh)
            || !positive_finite(self.sw) || !positive_finite(self.sh)
        {
            return Err(ScreenError::DegenerateExtent { gw: self.gw, gh: self.gh });
        }
        Ok(())
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.gx, self.gy)
    }

    #[inline]
    pub fn extent(&self) -> (f64, f64) {
        (self.gw, self.gh)
    }

    /// (min_gx, max_gx, min_gy, max_gy).
    #[inline]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.min_gx, self.max_gx, self.min_gy, self.max_gy)
    }

    #[inline]
    pub fn total_zoom(&self) -> f64 {
        self.total_zoom
    }

    /// Current screen dimensions the mapping is based on.
    #[inline]
    pub fn screen_size(&self) -> (f64, f64) {
        (self.sw, self.sh)
    }

    // ── mapping ───────────────────────────────────────────────────────────

    /// World point → screen-local pixel point.
    pub fn on_screen(&self, wx: f64, wy: f64) -> Result<(f64, f64), ScreenError> {
        self.check_extent()?;
        Ok((
            (wx - self.gx + self.gw / 2.0) * self.sw / self.gw,
            (wy - self.gy + self.gh / 2.0) * self.sh / self.gh,
        ))
    }

    /// Screen-local pixel point → world point. Exact inverse of `on_screen`.
    pub fn on_plot(&self, sx: f64, sy: f64) -> Result<(f64, f64), ScreenError> {
        self.check_extent()?;
        Ok((
            sx * self.gw / self.sw + self.gx - self.gw / 2.0,
            sy * self.gh / self.sh + self.gy - self.gh / 2.0,
        ))
    }

    // ── absolute view setters ─────────────────────────────────────────────

    /// Sets center and extents directly.
    pub fn set_coords(&mut self, gx: f64, gy: f64, gw: f64, gh: f64) {
        self.gx = gx;
        self.gy = gy;
        self.gw = gw;
        self.gh = gh;
        self.set_minmax();
    }

    /// Sets the view from a center and an area-scaling zoom relative to the
    /// original extent. Width derives from `original_width / sqrt(zoom)`;
    /// height always follows the screen aspect ratio.
    pub fn set_view(&mut self, gx: f64, gy: f64, zoom: f64) -> Result<(), ScreenError> {
        if !positive_finite(zoom) {
            return Err(ScreenError::InvalidZoomRatio { ratio: zoom });
        }
        self.gx = gx;
        self.gy = gy;
        self.total_zoom = zoom;
        self.gw = self.ogw / zoom.sqrt();
        self.gh = self.gw * self.sh / self.sw;
        self.set_minmax();
        Ok(())
    }

    /// Re-targets the view that [`reset`](Self::reset) restores.
    pub fn reset_to(&mut self, gx: f64, gy: f64, gw: f64, gh: f64) {
        self.ogx = gx;
        self.ogy = gy;
        self.ogw = gw;
        self.ogh = gh;
    }

    /// Restores the stored original view, rescaling extents by the ratio of
    /// the current screen size to the size at construction, and resets
    /// `total_zoom` to 1.
    pub fn reset(&mut self) {
        self.gx = self.ogx;
        self.gy = self.ogy;
        self.gw = self.ogw * (self.sw / self.ow);
        self.gh = self.ogh * (self.sh / self.oh);
        self.set_minmax();
        self.total_zoom = 1.0;
    }

    // ── zoom ──────────────────────────────────────────────────────────────

    /// Zooms in at a screen-local point: the point becomes the new center
    /// and both extents shrink by `ratio`.
    pub fn zoom_in_at(&mut self, sx: f64, sy: f64, ratio: f64) -> Result<(), ScreenError> {
        self.check_zoom_ratio(ratio)?;
        self.recenter_at(sx, sy);
        self.gw *= ratio;
        self.gh *= ratio;
        self.set_minmax();
        self.total_zoom *= (1.0 / ratio).powi(2);
        log::trace!(
            "zoomed to {:.5},{:.5} with size {:.9},{:.9}",
            self.gx, self.gy, self.gw, self.gh
        );
        Ok(())
    }

    /// Zooms out at a screen-local point: the point becomes the new center
    /// and both extents grow by `ratio`.
    pub fn zoom_out_at(&mut self, sx: f64, sy: f64, ratio: f64) -> Result<(), ScreenError> {
        self.check_zoom_ratio(ratio)?;
        self.recenter_at(sx, sy);
        self.gw /= ratio;
        self.gh /= ratio;
        self.set_minmax();
        self.total_zoom /= (1.0 / ratio).powi(2);
        log::trace!(
            "zoomed to {:.5},{:.5} with size {:.9},{:.9}",
            self.gx, self.gy, self.gw, self.gh
        );
        Ok(())
    }

    fn check_zoom_ratio(&self, ratio: f64) -> Result<(), ScreenError> {
        self.check_extent()?;
        if !positive_finite(ratio) {
            return Err(ScreenError::InvalidZoomRatio { ratio });
        }
        Ok(())
    }

    fn recenter_at(&mut self, sx: f64, sy: f64) {
        self.gx = self.gx - self.gw / 2.0 + sx * self.gw / self.sw;
        self.gy = self.gy - self.gh / 2.0 + sy * self.gh / self.sh;
    }

    // ── pan ───────────────────────────────────────────────────────────────

    /// Shifts the center by a world-space delta.
    pub fn shift_center(&mut self, dx: f64, dy: f64) {
        self.gx += dx;
        self.gy += dy;
        self.set_minmax();
    }

    /// Fixed-fraction pans: one fifth of the corresponding extent.
    pub fn nudge_up(&mut self) {
        self.gy += self.gh / 5.0;
        self.set_minmax();
    }

    pub fn nudge_down(&mut self) {
        self.gy -= self.gh / 5.0;
        self.set_minmax();
    }

    pub fn nudge_left(&mut self) {
        self.gx -= self.gw / 5.0;
        self.set_minmax();
    }

    pub fn nudge_right(&mut self) {
        self.gx += self.gw / 5.0;
        self.set_minmax();
    }

    // ── resize ────────────────────────────────────────────────────────────

    /// Refits the view to a new screen size, scaling extents proportionally
    /// so pixels-per-world-unit is preserved. `total_zoom` is untouched: it
    /// tracks zoom relative to the original view, which a density-preserving
    /// resize does not change.
    pub fn refit(&mut self, width: f64, height: f64) -> Result<(), ScreenError> {
        if !positive_finite(width) || !positive_finite(height) {
            return Err(ScreenError::DegenerateExtent { gw: width, gh: height });
        }
        self.check_extent()?;

        self.gw *= width / self.sw;
        self.gh *= height / self.sh;
        self.set_minmax();
        self.sw = width;
        self.sh = height;
        Ok(())
    }
}
