//! Timer primitives driven by explicit timestamps.

use foundation::time::Time;

/// Fires once after a quiet period with no further pokes.
#[derive(Debug, Clone, PartialEq)]
pub struct Debounce {
    quiet_ms: f64,
    deadline: Option<Time>,
}

impl Debounce {
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms: quiet_ms.max(0.0),
            deadline: None,
        }
    }

    pub fn quiet_ms(&self) -> f64 {
        self.quiet_ms
    }

    pub fn set_quiet_ms(&mut self, quiet_ms: f64) {
        self.quiet_ms = quiet_ms.max(0.0);
    }

    /// (Re)arms the timer; the deadline moves to `now + quiet_ms`.
    pub fn poke(&mut self, now: Time) {
        self.deadline = Some(now.plus_ms(self.quiet_ms));
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once per armed period, when `now` reaches the deadline.
    pub fn fire_if_due(&mut self, now: Time) -> bool {
        match self.deadline {
            Some(deadline) if now.ms() >= deadline.ms() => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// One-shot delay. Unlike [`Debounce`], re-starting while pending keeps the
/// first deadline unless [`Delay::restart`] is used.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delay {
    due: Option<Time>,
}

impl Delay {
    pub fn idle() -> Self {
        Self { due: None }
    }

    pub fn start(&mut self, now: Time, delay_ms: f64) {
        if self.due.is_none() {
            self.due = Some(now.plus_ms(delay_ms.max(0.0)));
        }
    }

    pub fn restart(&mut self, now: Time, delay_ms: f64) {
        self.due = Some(now.plus_ms(delay_ms.max(0.0)));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<Time> {
        self.due
    }

    pub fn fire_if_due(&mut self, now: Time) -> bool {
        match self.due {
            Some(due) if now.ms() >= due.ms() => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Debounce, Delay};
    use foundation::time::Time;

    #[test]
    fn debounce_waits_for_quiet_period() {
        let mut d = Debounce::new(100.0);
        d.poke(Time(0.0));
        d.poke(Time(60.0));
        assert!(!d.fire_if_due(Time(120.0)));
        assert!(d.fire_if_due(Time(160.0)));
        assert!(!d.fire_if_due(Time(500.0)));
    }

    #[test]
    fn unarmed_debounce_never_fires() {
        let mut d = Debounce::new(10.0);
        assert!(!d.is_pending());
        assert!(!d.fire_if_due(Time(1e9)));
    }

    #[test]
    fn delay_start_keeps_first_deadline() {
        let mut d = Delay::idle();
        d.start(Time(0.0), 10.0);
        d.start(Time(5.0), 10.0);
        assert_eq!(d.due(), Some(Time(10.0)));
        d.restart(Time(5.0), 10.0);
        assert_eq!(d.due(), Some(Time(15.0)));
        assert!(d.fire_if_due(Time(15.0)));
        assert!(!d.is_pending());
    }
}
