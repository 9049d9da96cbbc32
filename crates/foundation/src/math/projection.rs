//! Geographic → screen projection.
//!
//! The map itself is rendered by an external SDK; the showcase only needs its
//! `project(lon, lat) -> screen point` function. [`Projector`] is that seam.
//! [`MercatorView`] is a self-contained Web-Mercator camera with the same
//! conventions (512px tiles, top-left screen origin) used by native hosts and
//! tests.

use serde::{Deserialize, Serialize};

use super::Vec2;
use crate::bounds::Aabb2;

/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Maps geographic coordinates to screen pixels for the current camera.
pub trait Projector {
    fn project(&self, at: LonLat) -> Vec2;
}

impl<F> Projector for F
where
    F: Fn(LonLat) -> Vec2,
{
    fn project(&self, at: LonLat) -> Vec2 {
        self(at)
    }
}

const TILE_SIZE: f64 = 512.0;
const MAX_LAT: f64 = 85.051_128_779_806_59;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MercatorView {
    pub center: LonLat,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl MercatorView {
    pub fn new(center: LonLat, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Moves the camera so `bounds` fills the viewport minus `padding_px` on
    /// every side. Non-positive usable areas leave the zoom unchanged.
    pub fn fit_bounds(&mut self, bounds: Aabb2, padding_px: f64) {
        let sw = mercator_unit(LonLat::new(bounds.min[0], bounds.min[1]));
        let ne = mercator_unit(LonLat::new(bounds.max[0], bounds.max[1]));
        let span_x = (ne.x - sw.x).abs();
        let span_y = (ne.y - sw.y).abs();

        let usable_w = self.width - 2.0 * padding_px;
        let usable_h = self.height - 2.0 * padding_px;
        if usable_w > 0.0 && usable_h > 0.0 && span_x > 0.0 && span_y > 0.0 {
            let scale = (usable_w / (span_x * TILE_SIZE)).min(usable_h / (span_y * TILE_SIZE));
            self.zoom = scale.log2();
        }

        let mid = Vec2::new((sw.x + ne.x) * 0.5, (sw.y + ne.y) * 0.5);
        self.center = unit_to_lonlat(mid);
    }
}

impl Projector for MercatorView {
    fn project(&self, at: LonLat) -> Vec2 {
        let ws = self.world_size();
        let p = mercator_unit(at) * ws;
        let c = mercator_unit(self.center) * ws;
        p - c + Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Web-Mercator position in the unit square (x east, y south).
fn mercator_unit(at: LonLat) -> Vec2 {
    let lat = at.lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    let x = (at.lon + 180.0) / 360.0;
    let y = (1.0 - (std::f64::consts::FRAC_PI_4 + lat * 0.5).tan().ln() / std::f64::consts::PI) * 0.5;
    Vec2::new(x, y)
}

fn unit_to_lonlat(p: Vec2) -> LonLat {
    let lon = p.x * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * p.y);
    let lat = n.sinh().atan().to_degrees();
    LonLat::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::{LonLat, MercatorView, Projector};
    use crate::bounds::Aabb2;
    use crate::math::Vec2;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn center_projects_to_viewport_middle() {
        let view = MercatorView::new(LonLat::new(-8.41, 43.37), 12.0, 800.0, 600.0);
        let p = view.project(LonLat::new(-8.41, 43.37));
        assert_close(p.x, 400.0, 1e-6);
        assert_close(p.y, 300.0, 1e-6);
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let view = MercatorView::new(LonLat::new(0.0, 0.0), 3.0, 500.0, 500.0);
        let east = view.project(LonLat::new(1.0, 0.0));
        let north = view.project(LonLat::new(0.0, 1.0));
        assert!(east.x > 250.0);
        assert!(north.y < 250.0);
    }

    #[test]
    fn fit_bounds_keeps_corners_inside_padding() {
        let mut view = MercatorView::new(LonLat::new(0.0, 0.0), 1.0, 1000.0, 700.0);
        let bounds = Aabb2::around([-8.40858, 43.375986], 0.02);
        view.fit_bounds(bounds, 20.0);

        let sw = view.project(LonLat::new(bounds.min[0], bounds.min[1]));
        let ne = view.project(LonLat::new(bounds.max[0], bounds.max[1]));
        for p in [sw, ne] {
            assert!(p.x >= 20.0 - 1e-6 && p.x <= 980.0 + 1e-6, "{p:?}");
            assert!(p.y >= 20.0 - 1e-6 && p.y <= 680.0 + 1e-6, "{p:?}");
        }
    }

    #[test]
    fn closures_are_projectors() {
        let shift = |at: LonLat| Vec2::new(at.lon * 10.0, at.lat * 10.0);
        assert_eq!(shift.project(LonLat::new(1.0, 2.0)), Vec2::new(10.0, 20.0));
    }
}
