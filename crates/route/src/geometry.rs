//! Curve geometry over screen-space points.

use foundation::math::Vec2;
use serde::Serialize;

use crate::curves::{ControlOffset, CurveSegment};

/// Resolves a chord-relative control descriptor against concrete endpoints.
pub fn control_point(start: Vec2, end: Vec2, offset: ControlOffset) -> Vec2 {
    let chord = end - start;
    start + chord * offset.along + chord.perpendicular() * offset.perp
}

/// Cubic Bezier evaluation.
///
/// When `cp3` is given it takes the end-side control slot in place of `cp2`.
/// The curve stays cubic.
pub fn bezier_point(
    t: f64,
    start: Vec2,
    cp1: Vec2,
    cp2: Vec2,
    end: Vec2,
    cp3: Option<Vec2>,
) -> Vec2 {
    let end_control = cp3.unwrap_or(cp2);
    cubic(t, start, cp1, end_control, end)
}

fn cubic(t: f64, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Vec2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    p0 * (mt2 * mt) + p1 * (3.0 * mt2 * t) + p2 * (3.0 * mt * t2) + p3 * (t2 * t)
}

/// A segment with its control points resolved for the current projection.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ScreenCurve {
    pub start: Vec2,
    pub end: Vec2,
    pub cp1: Vec2,
    pub cp2: Vec2,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cp3: Option<Vec2>,
}

impl ScreenCurve {
    pub fn resolve(start: Vec2, end: Vec2, segment: &CurveSegment) -> Self {
        Self {
            start,
            end,
            cp1: control_point(start, end, segment.cp1),
            cp2: control_point(start, end, segment.cp2),
            cp3: segment.cp3.map(|c| control_point(start, end, c)),
        }
    }

    pub fn point_at(&self, t: f64) -> Vec2 {
        bezier_point(t, self.start, self.cp1, self.cp2, self.end, self.cp3)
    }

    /// SVG path data for drawing the static route.
    ///
    /// The three-control segment is drawn as a cubic to `cp3` followed by a
    /// smooth continuation to the end point.
    pub fn svg_path(&self) -> String {
        let (s, e, c1, c2) = (self.start, self.end, self.cp1, self.cp2);
        match self.cp3 {
            Some(c3) => format!(
                "M {} {} C {} {}, {} {}, {} {} S {} {}, {} {}",
                n(s.x), n(s.y), n(c1.x), n(c1.y), n(c2.x), n(c2.y), n(c3.x), n(c3.y),
                n(e.x), n(e.y), n(e.x), n(e.y)
            ),
            None => format!(
                "M {} {} C {} {}, {} {}, {} {}",
                n(s.x), n(s.y), n(c1.x), n(c1.y), n(c2.x), n(c2.y), n(e.x), n(e.y)
            ),
        }
    }
}

fn n(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
