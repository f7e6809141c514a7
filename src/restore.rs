//! Scroll position restorer
//!
//! Layout inside an embedded renderer can finish after the load-finished
//! signal, so the saved offset is applied only once the content is taller
//! than the viewport. Until then each attempt asks the caller to come back
//! after a short delay, up to a fixed number of retries.

use crate::ScrollGeometry;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoreState {
    /// A non-zero offset is waiting to be applied
    Pending { target: f64, retries: u32 },
    /// Nothing to restore, or the offset has been applied
    Done,
    /// The retry budget ran out; the document stays unscrolled
    GaveUp,
}

/// What the caller must do after an attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoreStep {
    /// Nothing to do
    Idle,
    /// Scroll to `(0, offset)` now
    Apply { offset: f64 },
    /// Attempt again after the given delay
    RetryAfter(Duration),
    /// Stop trying
    GaveUp,
}

#[derive(Debug, Clone)]
pub struct ScrollRestorer {
    state: RestoreState,
    retry_delay: Duration,
    max_retries: u32,
}

impl ScrollRestorer {
    pub fn new(target: f64, retry_delay: Duration, max_retries: u32) -> Self {
        let state = if target.is_finite() && target > 0.0 {
            RestoreState::Pending { target, retries: 0 }
        } else {
            RestoreState::Done
        };
        Self {
            state,
            retry_delay,
            max_retries,
        }
    }

    pub fn state(&self) -> RestoreState {
        self.state
    }

    /// Evaluate the current layout and advance the state machine.
    pub fn attempt(&mut self, geometry: ScrollGeometry) -> RestoreStep {
        let (target, retries) = match self.state {
            RestoreState::Pending { target, retries } => (target, retries),
            RestoreState::Done | RestoreState::GaveUp => return RestoreStep::Idle,
        };

        if geometry.content_exceeds_viewport() {
            self.state = RestoreState::Done;
            return RestoreStep::Apply { offset: target };
        }

        if retries >= self.max_retries {
            self.state = RestoreState::GaveUp;
            return RestoreStep::GaveUp;
        }

        self.state = RestoreState::Pending {
            target,
            retries: retries + 1,
        };
        RestoreStep::RetryAfter(self.retry_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(50);

    #[test]
    fn zero_target_is_done_immediately() {
        let mut r = ScrollRestorer::new(0.0, DELAY, 10);
        assert_eq!(r.state(), RestoreState::Done);
        assert_eq!(r.attempt(ScrollGeometry::new(0.0, 400.0, 2000.0)), RestoreStep::Idle);
    }

    #[test]
    fn short_layout_schedules_exactly_one_retry_per_attempt() {
        let mut r = ScrollRestorer::new(500.0, DELAY, 10);
        let short = ScrollGeometry::new(0.0, 800.0, 800.0);
        assert_eq!(r.attempt(short), RestoreStep::RetryAfter(DELAY));
        assert_eq!(r.state(), RestoreState::Pending { target: 500.0, retries: 1 });

        let tall = ScrollGeometry::new(0.0, 800.0, 3000.0);
        assert_eq!(r.attempt(tall), RestoreStep::Apply { offset: 500.0 });
        assert_eq!(r.state(), RestoreState::Done);
        assert_eq!(r.attempt(tall), RestoreStep::Idle);
    }

    #[test]
    fn gives_up_after_retry_budget() {
        let mut r = ScrollRestorer::new(500.0, DELAY, 3);
        let short = ScrollGeometry::new(0.0, 800.0, 100.0);
        for _ in 0..3 {
            assert_eq!(r.attempt(short), RestoreStep::RetryAfter(DELAY));
        }
        assert_eq!(r.attempt(short), RestoreStep::GaveUp);
        assert_eq!(r.state(), RestoreState::GaveUp);
        assert_eq!(r.attempt(ScrollGeometry::new(0.0, 800.0, 5000.0)), RestoreStep::Idle);
    }

    #[test]
    fn zero_budget_means_single_attempt() {
        let mut r = ScrollRestorer::new(120.0, DELAY, 0);
        assert_eq!(r.attempt(ScrollGeometry::new(0.0, 800.0, 100.0)), RestoreStep::GaveUp);
    }
}
