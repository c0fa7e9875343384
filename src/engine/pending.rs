//! Single-slot scheduled operation.
//!
//! Recording is simulated: starting one schedules a deadline, and the event
//! loop polls the session until the deadline passes. There is at most one
//! pending operation per session; starting another replaces it.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecording {
    step_id: String,
    started_at: Instant,
    deadline: Instant,
}

impl PendingRecording {
    pub fn new(step_id: impl Into<String>, now: Instant, duration: Duration) -> Self {
        Self {
            step_id: step_id.into(),
            started_at: now,
            deadline: now + duration,
        }
    }

    pub fn step_id(&self) -> &str {
        &self.step_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.deadline.duration_since(self.started_at)
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Time left before completion, zero once due
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_after_duration() {
        let now = Instant::now();
        let pending = PendingRecording::new("9", now, Duration::from_secs(3));
        assert!(!pending.is_due(now));
        assert!(!pending.is_due(now + Duration::from_millis(2999)));
        assert!(pending.is_due(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_remaining_saturates() {
        let now = Instant::now();
        let pending = PendingRecording::new("9", now, Duration::from_secs(3));
        assert_eq!(pending.remaining(now + Duration::from_secs(1)), Duration::from_secs(2));
        assert_eq!(pending.remaining(now + Duration::from_secs(10)), Duration::ZERO);
        assert_eq!(pending.duration(), Duration::from_secs(3));
    }
}
