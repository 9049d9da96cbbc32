//! Time-parameterised travel of the route indicator between waypoints.

use foundation::ids::WaypointId;
use foundation::math::{Projector, Vec2};
use foundation::time::Time;
use serde::{Deserialize, Serialize};

use crate::Route;
use crate::path::{DurationPolicy, generate_path};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerRounding {
    Ceil,
    Floor,
}

/// How a fractional position maps onto the waypoint reported as "current".
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscreteMarkerRule {
    pub rounding: MarkerRounding,
    /// Added to the position before rounding.
    pub bias: f64,
}

impl DiscreteMarkerRule {
    pub const FORWARD: Self = Self {
        rounding: MarkerRounding::Ceil,
        bias: 0.0,
    };
    pub const BACKWARD: Self = Self {
        rounding: MarkerRounding::Floor,
        bias: 0.05,
    };

    pub fn apply(&self, position: f64) -> f64 {
        let biased = position + self.bias;
        match self.rounding {
            MarkerRounding::Ceil => biased.ceil(),
            MarkerRounding::Floor => biased.floor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimatorConfig {
    #[serde(flatten)]
    pub duration: DurationPolicy,
    pub forward_marker: DiscreteMarkerRule,
    pub backward_marker: DiscreteMarkerRule,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            duration: DurationPolicy::default(),
            forward_marker: DiscreteMarkerRule::FORWARD,
            backward_marker: DiscreteMarkerRule::BACKWARD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Animation {
    path: Vec<WaypointId>,
    start_time: Time,
    duration_ms: f64,
    start_position: f64,
    target: WaypointId,
}

impl Animation {
    fn is_forward(&self) -> bool {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => last > first,
            _ => true,
        }
    }
}

/// Result of advancing the animator by one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimatorTick {
    pub position: f64,
    /// Screen point of the indicator; `None` when the route cannot be projected.
    pub point: Option<Vec2>,
    pub marker_changed: Option<WaypointId>,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct PathAnimator {
    config: AnimatorConfig,
    position: f64,
    marker: WaypointId,
    animation: Option<Animation>,
}

impl PathAnimator {
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            config,
            position: 1.0,
            marker: WaypointId(1),
            animation: None,
        }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn current_marker(&self) -> WaypointId {
        self.marker
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn target(&self) -> Option<WaypointId> {
        self.animation.as_ref().map(|a| a.target)
    }

    pub fn path(&self) -> &[WaypointId] {
        self.animation
            .as_ref()
            .map(|a| a.path.as_slice())
            .unwrap_or(&[])
    }

    pub fn duration_ms(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.duration_ms)
    }

    /// Places the indicator at rest on `id`, cancelling any travel.
    pub fn reset_to(&mut self, id: WaypointId) {
        self.animation = None;
        self.position = id.as_position();
        self.marker = id;
    }

    /// Starts travelling from the current exact position towards `id`.
    ///
    /// Returns `false` when the request changes nothing.
    pub fn request_target(&mut self, id: WaypointId, now: Time, route: &Route) -> bool {
        if route.len() < 2 || !route.waypoints().contains(id) {
            tracing::trace!(waypoint = %id, "animator: target ignored (unknown waypoint)");
            return false;
        }
        match &self.animation {
            None if self.position == id.as_position() => return false,
            Some(animation) if animation.target == id => return false,
            _ => {}
        }

        let path = generate_path(self.position, id);
        if path.len() <= 1 {
            return false;
        }

        let duration_ms = self.config.duration.duration_ms(self.position, id);
        tracing::debug!(
            from = self.position,
            waypoint = %id,
            duration_ms,
            redirected = self.animation.is_some(),
            "animator: travel started"
        );
        self.animation = Some(Animation {
            path,
            start_time: now,
            duration_ms,
            start_position: self.position,
            target: id,
        });
        true
    }

    /// Advances to `now`, projecting against the map as it is this frame.
    pub fn tick(&mut self, now: Time, route: &Route, projector: &dyn Projector) -> AnimatorTick {
        let Some(animation) = &self.animation else {
            return AnimatorTick {
                position: self.position,
                point: self.resting_point(route, projector),
                marker_changed: None,
                completed: false,
            };
        };

        let progress = if animation.duration_ms > 0.0 {
            (now.since(animation.start_time) / animation.duration_ms).min(1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            let target = animation.target;
            self.animation = None;
            self.position = target.as_position();
            self.marker = target;
            tracing::debug!(waypoint = %target, "animator: travel complete");
            return AnimatorTick {
                position: self.position,
                point: route.project(target, projector),
                marker_changed: Some(target),
                completed: true,
            };
        }

        let start = animation.start_position;
        let end = animation.target.as_position();
        let position = start + (end - start) * progress;
        let rule = if animation.is_forward() {
            self.config.forward_marker
        } else {
            self.config.backward_marker
        };
        let max_id = route.waypoints().max_id() as f64;
        let display = WaypointId(rule.apply(position).clamp(1.0, max_id) as u32);

        self.position = position;
        let marker_changed = if display != self.marker {
            self.marker = display;
            Some(display)
        } else {
            None
        };

        AnimatorTick {
            position,
            point: point_on_route(position, route, projector),
            marker_changed,
            completed: false,
        }
    }

    /// Screen position of the indicator when nothing is moving.
    pub fn resting_point(&self, route: &Route, projector: &dyn Projector) -> Option<Vec2> {
        point_on_route(self.position, route, projector)
    }
}

impl Default for PathAnimator {
    fn default() -> Self {
        Self::new(AnimatorConfig::default())
    }
}

fn point_on_route(position: f64, route: &Route, projector: &dyn Projector) -> Option<Vec2> {
    let max_id = route.waypoints().max_id();
    let lower = position.floor().max(1.0) as u32;
    if lower >= max_id {
        return route.project(WaypointId(max_id), projector);
    }
    let t = position - lower as f64;
    let lower = WaypointId(lower);
    if t == 0.0 {
        return route.project(lower, projector);
    }
    route
        .screen_curve(lower, projector)
        .map(|curve| curve.point_at(t))
}
