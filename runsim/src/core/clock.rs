use std::time::Instant;

/// SystemClock is the monotonic time source of the simulator. All core methods take plain
/// second timestamps, so the clock is only consulted by the outer driver loop; tests drive
/// the core with hand-picked timestamps instead.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// new creates a clock whose zero point is the moment of creation.
    pub fn new() -> SystemClock {
        SystemClock {
            origin: Instant::now(),
        }
    }

    /// now_s returns the seconds elapsed since the clock was created.
    pub fn now_s(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}
