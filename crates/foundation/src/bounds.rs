use serde::{Deserialize, Serialize};

/// Axis-aligned bounds in lon/lat degrees: `min = [west, south]`, `max = [east, north]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Square box of `half_extent` degrees around `center`.
    pub fn around(center: [f64; 2], half_extent: f64) -> Self {
        Aabb2 {
            min: [center[0] - half_extent, center[1] - half_extent],
            max: [center[0] + half_extent, center[1] + half_extent],
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }
}

/// Screen-space rectangle in CSS pixels (top-left origin).
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Linear blend between two rects, `t` clamped to `[0, 1]`.
    pub fn lerp(self, to: Rect, t: f64) -> Rect {
        let t = t.clamp(0.0, 1.0);
        Rect {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            width: self.width + (to.width - self.width) * t,
            height: self.height + (to.height - self.height) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Aabb2, Rect};
    use pretty_assertions::assert_eq;

    #[test]
    fn around_is_centered() {
        let b = Aabb2::around([-8.4, 43.3], 0.02);
        let c = b.center();
        assert!((c[0] + 8.4).abs() < 1e-12);
        assert!((c[1] - 43.3).abs() < 1e-12);
    }

    #[test]
    fn rect_lerp_endpoints() {
        let a = Rect::new(10.0, 20.0, 100.0, 50.0);
        let b = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, 0.5).width, 1010.0);
    }
}
