use foundation::ids::WaypointId;
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::waypoint::WaypointSet;

/// Control point expressed relative to a segment's chord.
///
/// `along` is the fraction of the chord from the start point; `perp` is the
/// offset along the chord's left-hand perpendicular, as a fraction of the
/// chord length. Both survive re-projection unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlOffset {
    pub along: f64,
    pub perp: f64,
}

impl ControlOffset {
    pub const fn new(along: f64, perp: f64) -> Self {
        Self { along, perp }
    }

    fn is_finite(&self) -> bool {
        self.along.is_finite() && self.perp.is_finite()
    }
}

/// Control descriptors for the curve between waypoints `i` and `i + 1`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSegment {
    pub cp1: ControlOffset,
    pub cp2: ControlOffset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp3: Option<ControlOffset>,
}

impl CurveSegment {
    pub const fn new(cp1: ControlOffset, cp2: ControlOffset) -> Self {
        Self { cp1, cp2, cp3: None }
    }

    pub const fn with_end_control(
        cp1: ControlOffset,
        cp2: ControlOffset,
        cp3: ControlOffset,
    ) -> Self {
        Self {
            cp1,
            cp2,
            cp3: Some(cp3),
        }
    }

    /// Controls on the chord at thirds: renders as a straight line.
    pub const fn straight() -> Self {
        Self::new(ControlOffset::new(1.0 / 3.0, 0.0), ControlOffset::new(2.0 / 3.0, 0.0))
    }

    fn is_finite(&self) -> bool {
        self.cp1.is_finite() && self.cp2.is_finite() && self.cp3.is_none_or(|c| c.is_finite())
    }
}

/// Curve segments indexed by their lower waypoint id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveTable {
    segments: Vec<CurveSegment>,
}

impl CurveTable {
    pub fn new(segments: Vec<CurveSegment>) -> Self {
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment `(lower, lower + 1)`; `None` outside the table.
    pub fn segment(&self, lower: WaypointId) -> Option<&CurveSegment> {
        let index = (lower.get() as usize).checked_sub(1)?;
        self.segments.get(index)
    }

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    /// Requires exactly one segment per adjacent waypoint pair.
    pub fn check_against(&self, waypoints: &WaypointSet) -> Result<(), RouteError> {
        let expected = waypoints.len().saturating_sub(1);
        if self.segments.len() != expected {
            return Err(RouteError::CurveCountMismatch {
                expected,
                found: self.segments.len(),
            });
        }
        for (index, segment) in self.segments.iter().enumerate() {
            if !segment.is_finite() {
                return Err(RouteError::NonFiniteControl {
                    segment: WaypointId(index as u32 + 1),
                });
            }
        }
        Ok(())
    }
}
