//! Waypoints, the curves between them, and the indicator that travels along them.

pub mod animator;
pub mod curves;
pub mod error;
pub mod geometry;
pub mod path;
pub mod waypoint;

pub use animator::*;
pub use curves::*;
pub use error::*;
pub use geometry::*;
pub use path::*;
pub use waypoint::*;

use foundation::ids::WaypointId;
use foundation::math::{Projector, Vec2};

/// Validated itinerary: waypoints plus one curve per adjacent pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    waypoints: WaypointSet,
    curves: CurveTable,
}

impl Route {
    pub fn new(waypoints: WaypointSet, curves: CurveTable) -> Result<Self, RouteError> {
        curves.check_against(&waypoints)?;
        Ok(Self { waypoints, curves })
    }

    pub fn waypoints(&self) -> &WaypointSet {
        &self.waypoints
    }

    pub fn curves(&self) -> &CurveTable {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(id)
    }

    pub fn project(&self, id: WaypointId, projector: &dyn Projector) -> Option<Vec2> {
        self.waypoint(id).map(|w| projector.project(w.coordinates))
    }

    /// Segment curve between `lower` and `lower + 1`, resolved against the
    /// current projection.
    pub fn screen_curve(&self, lower: WaypointId, projector: &dyn Projector) -> Option<ScreenCurve> {
        let segment = self.curves.segment(lower)?;
        let start = self.project(lower, projector)?;
        let end = self.project(WaypointId(lower.get() + 1), projector)?;
        Some(ScreenCurve::resolve(start, end, segment))
    }

    /// Every segment of the itinerary in order, for drawing the static path.
    pub fn screen_curves(&self, projector: &dyn Projector) -> Vec<ScreenCurve> {
        self.waypoints
            .iter()
            .filter_map(|w| self.screen_curve(w.id, projector))
            .collect()
    }

    pub fn marker_positions(&self, projector: &dyn Projector) -> Vec<(WaypointId, Vec2)> {
        self.waypoints
            .iter()
            .map(|w| (w.id, projector.project(w.coordinates)))
            .collect()
    }
}
