//! Three-position image strip: thumbnail crossfades, full-resolution
//! preloading and the expanded overlay.

pub mod command;
pub mod crossfade;
pub mod expansion;
pub mod gallery;
pub mod layout;
pub mod request;
pub mod slot;
pub mod sources;

pub use command::*;
pub use crossfade::*;
pub use expansion::*;
pub use gallery::*;
pub use layout::*;
pub use request::*;
pub use slot::*;
pub use sources::*;
