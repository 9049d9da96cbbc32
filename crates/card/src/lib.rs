pub mod text_queue;
pub mod welcome;

pub use text_queue::*;
pub use welcome::*;
