use foundation::ids::WaypointId;
use foundation::math::LonLat;
use serde::{Deserialize, Serialize};

use crate::error::RouteError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub name: String,
    pub coordinates: LonLat,
}

impl Waypoint {
    pub fn new(id: u32, name: impl Into<String>, coordinates: LonLat) -> Self {
        Self {
            id: WaypointId(id),
            name: name.into(),
            coordinates,
        }
    }
}

/// Waypoints with dense ids `1..=N`, stored so that id `n` lives at index `n - 1`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaypointSet {
    items: Vec<Waypoint>,
}

impl WaypointSet {
    pub fn new(items: Vec<Waypoint>) -> Result<Self, RouteError> {
        for (index, w) in items.iter().enumerate() {
            let expected = index as u32 + 1;
            if w.id.get() != expected {
                return Err(RouteError::NonSequentialId {
                    index,
                    expected,
                    found: w.id.get(),
                });
            }
            if w.name.trim().is_empty() {
                return Err(RouteError::EmptyName { id: w.id });
            }
            if !w.coordinates.lon.is_finite() || !w.coordinates.lat.is_finite() {
                return Err(RouteError::NonFiniteCoordinate { id: w.id });
            }
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        let index = (id.get() as usize).checked_sub(1)?;
        self.items.get(index)
    }

    pub fn contains(&self, id: WaypointId) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> Option<&Waypoint> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&Waypoint> {
        self.items.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.items.iter()
    }

    /// Largest id, or 0 when empty.
    pub fn max_id(&self) -> u32 {
        self.items.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::{Waypoint, WaypointSet};
    use crate::error::RouteError;
    use foundation::ids::WaypointId;
    use foundation::math::LonLat;

    #[test]
    fn lookup_by_id() {
        let set = WaypointSet::new(vec![
            Waypoint::new(1, "Torre", LonLat::new(-8.406, 43.385)),
            Waypoint::new(2, "Orzán", LonLat::new(-8.404, 43.372)),
        ])
        .unwrap();
        assert_eq!(set.get(WaypointId(2)).map(|w| w.name.as_str()), Some("Orzán"));
        assert!(set.get(WaypointId(0)).is_none());
        assert!(set.get(WaypointId(3)).is_none());
        assert_eq!(set.max_id(), 2);
    }

    #[test]
    fn gaps_are_rejected() {
        let err = WaypointSet::new(vec![
            Waypoint::new(1, "a", LonLat::new(0.0, 0.0)),
            Waypoint::new(3, "c", LonLat::new(0.0, 0.0)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RouteError::NonSequentialId {
                index: 1,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        let err = WaypointSet::new(vec![Waypoint::new(1, "  ", LonLat::new(0.0, 0.0))]).unwrap_err();
        assert_eq!(err, RouteError::EmptyName { id: WaypointId(1) });
    }
}
