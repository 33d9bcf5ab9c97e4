//! Elapsed-time measurement for audit runs

use std::time::{Duration, Instant};

/// Wall-clock timer started on construction
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time rendered by [`format_duration`]
    pub fn elapsed_formatted(&self) -> String {
        format_duration(self.elapsed())
    }
}

/// Render a duration as `< 1ms`, `NNNms` or `N.NNs`
pub fn format_duration(duration: Duration) -> String {
    match duration.as_millis() {
        0 => "< 1ms".to_string(),
        ms if ms < 1000 => format!("{}ms", ms),
        _ => format!("{:.2}s", duration.as_secs_f64()),
    }
}
