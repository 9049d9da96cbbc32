use serde::{Deserialize, Serialize};

/// Stable 1-based identifier of a waypoint on the itinerary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(pub u32);

impl WaypointId {
    pub fn new(n: u32) -> Self {
        WaypointId(n)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Position of this waypoint on the fractional animation axis.
    pub fn as_position(self) -> f64 {
        self.0 as f64
    }
}

impl std::fmt::Display for WaypointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
