use foundation::time::Time;

/// Metadata for one display refresh.
///
/// Hosts feed their `requestAnimationFrame` (or equivalent) timestamps into a
/// [`FrameClock`]; everything downstream only ever sees `Frame` values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Host time at the start of the frame.
    pub now: Time,
    /// Milliseconds since the previous frame (0 for the first frame).
    pub dt_ms: f64,
}

/// Turns raw host timestamps into a monotonic sequence of frames.
///
/// Timestamps that go backwards (tab restore, clock adjustment) are clamped to
/// the previous frame time so animation progress never rewinds.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Frame>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn advance(&mut self, host_now: Time) -> Frame {
        let frame = match self.last {
            None => Frame {
                index: 0,
                now: host_now,
                dt_ms: 0.0,
            },
            Some(prev) => {
                let now = prev.now.max(host_now);
                if host_now.ms() < prev.now.ms() {
                    tracing::trace!(
                        prev = prev.now.ms(),
                        host = host_now.ms(),
                        "host clock went backwards; clamping"
                    );
                }
                Frame {
                    index: prev.index + 1,
                    now,
                    dt_ms: now.since(prev.now),
                }
            }
        };
        self.last = Some(frame);
        frame
    }

    pub fn last(&self) -> Option<Frame> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::FrameClock;
    use foundation::time::Time;

    #[test]
    fn first_frame_has_zero_delta() {
        let mut clock = FrameClock::new();
        let f = clock.advance(Time(1000.0));
        assert_eq!(f.index, 0);
        assert_eq!(f.dt_ms, 0.0);
        assert_eq!(f.now, Time(1000.0));
    }

    #[test]
    fn advances_index_and_delta() {
        let mut clock = FrameClock::new();
        clock.advance(Time(0.0));
        let f1 = clock.advance(Time(16.0));
        assert_eq!(f1.index, 1);
        assert_eq!(f1.dt_ms, 16.0);
    }

    #[test]
    fn backwards_time_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(Time(100.0));
        let f = clock.advance(Time(40.0));
        assert_eq!(f.now, Time(100.0));
        assert_eq!(f.dt_ms, 0.0);
        assert_eq!(clock.last().map(|f| f.index), Some(1));
    }
}
