use std::time::Instant;

/// Monotonic stopwatch for the elapsed-time prefix on status messages.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Seconds since `start`, callable repeatedly with no upper bound.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Decompose a duration in whole seconds into hours, minutes, and seconds.
pub fn split_duration(seconds: u64) -> (u64, u64, u64) {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    (hours, minutes, secs)
}

/// Render a duration in whole seconds as a zero-padded `HH:MM:SS` clock.
pub fn format_clock(seconds: u64) -> String {
    let (hours, minutes, secs) = split_duration(seconds);
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
