use web_time::{Duration, Instant};

/// Frame interval used by [`VirtualClock::advance_frame`], about 60 Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Deterministic time source for frame-driven tests.
#[derive(Clone, Copy, Debug)]
pub struct VirtualClock {
    now: Instant,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }

    pub fn advance_frame(&mut self) -> Instant {
        self.advance(FRAME_INTERVAL)
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}
