pub mod bounds;
pub mod ids;
pub mod math;
pub mod time;

// Geometry, time and id primitives shared by every showcase crate.
pub use bounds::*;
pub use ids::*;
pub use time::*;
