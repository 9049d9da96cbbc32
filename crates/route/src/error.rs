use foundation::ids::WaypointId;

#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Waypoint ids must run `1..=N` in order.
    NonSequentialId { index: usize, expected: u32, found: u32 },
    EmptyName { id: WaypointId },
    NonFiniteCoordinate { id: WaypointId },
    CurveCountMismatch { expected: usize, found: usize },
    NonFiniteControl { segment: WaypointId },
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::NonSequentialId {
                index,
                expected,
                found,
            } => write!(
                f,
                "waypoint #{index} has id {found}, expected {expected} (ids must be 1..=N in order)"
            ),
            RouteError::EmptyName { id } => write!(f, "waypoint {id} has an empty name"),
            RouteError::NonFiniteCoordinate { id } => {
                write!(f, "waypoint {id} has a non-finite coordinate")
            }
            RouteError::CurveCountMismatch { expected, found } => write!(
                f,
                "curve table has {found} segments, expected {expected} (one per adjacent waypoint pair)"
            ),
            RouteError::NonFiniteControl { segment } => {
                write!(f, "curve segment {segment} has a non-finite control offset")
            }
        }
    }
}

impl std::error::Error for RouteError {}
