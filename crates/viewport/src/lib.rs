//! Viewport scale and device-class tracking.

pub mod device;
pub mod manager;
pub mod scale;
pub mod style;

pub use device::*;
pub use manager::*;
pub use scale::*;
pub use style::*;
