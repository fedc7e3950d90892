//! The viewport: pan/zoom state and the world↔screen transform.
//!
//! Screen space follows the canvas convention: pixels, origin at the top
//! left, y growing downward. The render layer flips to Bevy's y-up world
//! exactly once, when positioning entities.

use bevy_math::DVec2;

/// Pixel spacing the grid aims for before snapping to a nice world step.
const GRID_TARGET_PX: f64 = 50.0;
/// Scale at which the zoom readout shows 1.0x.
const BASE_SCALE: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical canvas width in pixels.
    pub width: f64,
    /// Logical canvas height in pixels.
    pub height: f64,
    /// Pixels per world unit.
    pub scale: f64,
    /// Pan offset in pixels.
    pub offset_x: f64,
    /// Pan offset in pixels.
    pub offset_y: f64,
    /// Device pixel ratio of the render surface.
    pub pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            scale: BASE_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    pub fn world_to_screen(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x * self.scale + self.width / 2.0 + self.offset_x,
            -p.y * self.scale + self.height / 2.0 + self.offset_y,
        )
    }

    pub fn screen_to_world(&self, s: DVec2) -> DVec2 {
        DVec2::new(
            (s.x - self.width / 2.0 - self.offset_x) / self.scale,
            -(s.y - self.height / 2.0 - self.offset_y) / self.scale,
        )
    }

    /// Visible world x-interval, left to right.
    pub fn world_x_span(&self) -> (f64, f64) {
        (
            self.screen_to_world(DVec2::ZERO).x,
            self.screen_to_world(DVec2::new(self.width, 0.0)).x,
        )
    }

    /// Visible world y-interval, bottom to top.
    pub fn world_y_span(&self) -> (f64, f64) {
        (
            self.screen_to_world(DVec2::new(0.0, self.height)).y,
            self.screen_to_world(DVec2::ZERO).y,
        )
    }

    /// World spacing between grid lines: the `{1,2,5,10}·10^k` step that
    /// brings the on-screen spacing closest to the 50 px target.
    pub fn grid_spacing(&self) -> f64 {
        let raw = GRID_TARGET_PX / self.scale;
        let exponent = raw.log10().floor();
        let base = 10f64.powf(exponent);
        let fraction = raw / base;

        let nice = if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        };

        nice * base
    }

    /// Zoom by `factor`, keeping the world point under `anchor` (screen
    /// pixels) fixed on screen. This is what mouse-wheel zoom wants.
    pub fn zoom_about(&mut self, anchor: DVec2, factor: f64) {
        let pinned = self.screen_to_world(anchor);
        self.scale *= factor;
        let moved = self.world_to_screen(pinned);
        self.offset_x += anchor.x - moved.x;
        self.offset_y += anchor.y - moved.y;
    }

    /// Zoom by `factor` without touching the pan offset (anchored at the
    /// world origin's screen position).
    pub fn zoom(&mut self, factor: f64) {
        self.scale *= factor;
    }

    pub fn pan_by(&mut self, delta: DVec2) {
        self.offset_x += delta.x;
        self.offset_y += delta.y;
    }

    pub fn reset(&mut self) {
        self.scale = BASE_SCALE;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Zoom level relative to the default scale, for the readout.
    pub fn zoom_level(&self) -> f64 {
        self.scale / BASE_SCALE
    }
}

/// Format an axis tick value for a given grid spacing: whole numbers at
/// coarse spacings, more decimals as the grid refines, exponential
/// notation once magnitudes leave [1e-4, 1e6).
pub fn format_tick(value: f64, spacing: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e6 || magnitude < 1e-4 {
        return format!("{value:.1e}");
    }

    let decimals = (-spacing.log10().floor()).max(0.0) as usize;
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn viewport() -> Viewport {
        Viewport {
            width: 640.0,
            height: 480.0,
            scale: 50.0,
            offset_x: 37.0,
            offset_y: -12.0,
            pixel_ratio: 2.0,
        }
    }

    #[test]
    fn round_trips_world_points() {
        let vp = viewport();
        // Deterministic pseudo-random points inside the visible bounds
        let mut seed = 0x2545f491u64;
        for _ in 0..100 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let fx = (seed & 0xffff) as f64 / 65535.0;
            let fy = ((seed >> 16) & 0xffff) as f64 / 65535.0;

            let (left, right) = vp.world_x_span();
            let (bottom, top) = vp.world_y_span();
            let p = DVec2::new(left + fx * (right - left), bottom + fy * (top - bottom));

            let back = vp.screen_to_world(vp.world_to_screen(p));
            assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
            assert_relative_eq!(back.y, p.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn screen_y_grows_downward() {
        let vp = Viewport::default();
        let above = vp.world_to_screen(DVec2::new(0.0, 1.0));
        let below = vp.world_to_screen(DVec2::new(0.0, -1.0));
        assert!(above.y < below.y);
    }

    #[test]
    fn x_span_widens_as_scale_drops() {
        let mut vp = Viewport::default();
        let (l1, r1) = vp.world_x_span();
        vp.zoom(0.5);
        let (l2, r2) = vp.world_x_span();
        assert!(r2 - l2 > r1 - l1);
        assert!(l2 < l1 && r2 > r1);
    }

    #[test]
    fn grid_spacing_snaps_to_nice_steps() {
        let mut vp = Viewport::default();

        vp.scale = 50.0; // raw 1.0 -> 1
        assert_relative_eq!(vp.grid_spacing(), 1.0);

        vp.scale = 25.0; // raw 2.0 -> 2
        assert_relative_eq!(vp.grid_spacing(), 2.0);

        vp.scale = 10.0; // raw 5.0 -> 5
        assert_relative_eq!(vp.grid_spacing(), 5.0);

        vp.scale = 6.0; // raw 8.33 -> 10
        assert_relative_eq!(vp.grid_spacing(), 10.0);

        vp.scale = 500.0; // raw 0.1 -> 0.1
        assert_relative_eq!(vp.grid_spacing(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn zoom_about_pins_the_anchor() {
        let mut vp = viewport();
        let anchor = DVec2::new(100.0, 400.0);
        let pinned = vp.screen_to_world(anchor);

        vp.zoom_about(anchor, 1.1);
        let back = vp.world_to_screen(pinned);
        assert_relative_eq!(back.x, anchor.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, anchor.y, epsilon = 1e-9);
        assert_relative_eq!(vp.scale, 55.0);
    }

    #[test]
    fn reset_restores_default_view() {
        let mut vp = viewport();
        vp.zoom_about(DVec2::new(10.0, 10.0), 3.0);
        vp.pan_by(DVec2::new(25.0, -4.0));
        vp.reset();
        assert_relative_eq!(vp.zoom_level(), 1.0);
        assert_relative_eq!(vp.offset_x, 0.0);
        assert_relative_eq!(vp.offset_y, 0.0);
    }

    #[test]
    fn tick_labels_follow_spacing() {
        assert_eq!(format_tick(0.0, 1.0), "0");
        assert_eq!(format_tick(3.0, 1.0), "3");
        assert_eq!(format_tick(2.5, 0.5), "2.5");
        assert_eq!(format_tick(-0.25, 0.05), "-0.25");
        assert_eq!(format_tick(1.5e7, 1e6), "1.5e7");
        assert_eq!(format_tick(2e-5, 1e-5), "2.0e-5");
    }
}
