use std::time::{Duration, Instant};

/// Wall-clock time since the program started, as fed to the `time` uniform.
#[derive(Debug, Copy, Clone)]
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
