use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// A wall-clock budget measured from when the deadline was created.
///
/// The decoder polls this between tokens rather than enforcing it from another
/// thread, so a reader that blocks will still block. Hard preemption of a slow
/// source has to happen at the source.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Self {
            start: Instant::now(),
            budget: None,
        }
    }

    /// A deadline that expires `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget: Some(budget),
        }
    }

    pub(crate) fn from_budget(budget: Option<Duration>) -> Self {
        match budget {
            Some(budget) => Self::after(budget),
            None => Self::none(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn is_expired(&self) -> bool {
        match self.budget {
            Some(budget) => self.elapsed() >= budget,
            None => false,
        }
    }

    /// Returns a `ParseTimeout` error once the budget is spent.
    pub fn check(&self) -> Result<()> {
        if self.is_expired() {
            Err(Error::timeout(self.elapsed()))
        } else {
            Ok(())
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
