use serde::{Deserialize, Serialize};

/// Timestamp on the host's monotonic animation clock, in milliseconds.
///
/// Every state machine in the workspace takes `Time` as an explicit argument
/// instead of reading a clock, so runs can be replayed frame by frame.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_ms(ms: f64) -> Self {
        Time(ms)
    }

    pub fn ms(self) -> f64 {
        self.0
    }

    pub fn plus_ms(self, ms: f64) -> Self {
        Time(self.0 + ms)
    }

    /// Milliseconds elapsed since `earlier`, never negative.
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn max(self, other: Time) -> Time {
        if other.0 > self.0 { other } else { self }
    }
}
