use std::time::{Duration, Instant};

/// Overall launch deadline, consulted at loop boundaries by the scanner and
/// the resolver. `None` means unbounded.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn from_timeout(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn unbounded() -> Self {
        Self::from_timeout(None)
    }

    pub fn expired(&self) -> bool {
        match self.budget {
            Some(budget) => self.started.elapsed() >= budget,
            None => false,
        }
    }

    /// The configured budget, for error reporting.
    pub fn budget(&self) -> Duration {
        self.budget.unwrap_or_default()
    }
}
