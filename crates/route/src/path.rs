use foundation::ids::WaypointId;
use serde::{Deserialize, Serialize};

/// Waypoint ids visited when travelling from `from` (possibly fractional) to `to`.
///
/// The path starts at `floor(from)`; when that already equals `to` and the
/// indicator sits between waypoints, it is `[ceil(from), to]` so the traversal
/// runs back down the segment it is on. Empty when `from` is exactly `to`.
pub fn generate_path(from: f64, to: WaypointId) -> Vec<WaypointId> {
    let target = to.get() as i64;
    let lower = from.floor() as i64;

    if lower == target {
        if from.fract() != 0.0 {
            return vec![WaypointId(from.ceil() as u32), to];
        }
        return Vec::new();
    }

    let ids: Vec<i64> = if lower < target {
        (lower..=target).collect()
    } else {
        (target..=lower).rev().collect()
    };
    ids.into_iter()
        .filter(|&id| id >= 1)
        .map(|id| WaypointId(id as u32))
        .collect()
}

/// Total travel time for a request, proportional to distance with a floor.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DurationPolicy {
    pub ms_per_waypoint: f64,
    pub min_duration_ms: f64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            ms_per_waypoint: 8000.0,
            min_duration_ms: 4000.0,
        }
    }
}

impl DurationPolicy {
    pub fn duration_ms(&self, from: f64, to: WaypointId) -> f64 {
        let distance = (to.get() as f64 - from).abs();
        (distance * self.ms_per_waypoint).max(self.min_duration_ms)
    }
}
