/// Running totals for one session. Lives only in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    iterations: u64,
    total_response_secs: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one completed round.
    pub fn record(&mut self, response_secs: u64) {
        self.iterations += 1;
        self.total_response_secs = self.total_response_secs.saturating_add(response_secs);
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Mean response time in whole seconds, truncated. Zero before the first round.
    pub fn average_response_secs(&self) -> u64 {
        match self.iterations {
            0 => 0,
            n => self.total_response_secs / n,
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "You placed {} iterations and your average response time was {} seconds.",
            self.iterations,
            self.average_response_secs()
        )
    }
}
