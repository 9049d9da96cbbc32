//! The coastal itinerary showcase: every component wired together behind a
//! host-driven, frame-at-a-time API.

pub mod config;
pub mod event;
pub mod map;
pub mod showcase;

pub use config::*;
pub use event::*;
pub use map::*;
pub use showcase::*;
