//! Single-slot deferred task that settles the crop frame after the user
//! stops interacting.
//!
//! Time is supplied by the host as milliseconds on any monotonic clock, so
//! the timer itself never reads a clock.

use serde::{Deserialize, Serialize};

/// At most one pending deadline. Scheduling replaces any earlier deadline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettleTimer {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl SettleTimer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            deadline: None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Arm the timer to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    /// Push the deadline back, but only if one is already pending.
    pub fn reschedule_if_pending(&mut self, now_ms: f64) -> bool {
        if self.is_pending() {
            self.schedule(now_ms);
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Consume the deadline if it has passed. Returns true exactly once per
    /// scheduled deadline.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timer = SettleTimer::new(2000.0);
        timer.schedule(100.0);
        assert!(!timer.poll(2099.0));
        assert!(timer.poll(2100.0));
        assert!(!timer.poll(5000.0));
    }

    #[test]
    fn test_cancel() {
        let mut timer = SettleTimer::new(2000.0);
        timer.schedule(0.0);
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.poll(10_000.0));
    }

    #[test]
    fn test_reschedule_only_when_pending() {
        let mut timer = SettleTimer::new(2000.0);
        assert!(!timer.reschedule_if_pending(500.0));
        assert!(!timer.is_pending());

        timer.schedule(0.0);
        assert!(timer.reschedule_if_pending(1500.0));
        assert_eq!(timer.deadline(), Some(3500.0));
        assert!(!timer.poll(2000.0));
        assert!(timer.poll(3500.0));
    }

    #[test]
    fn test_negative_delay_fires_immediately() {
        let mut timer = SettleTimer::new(-5.0);
        timer.schedule(10.0);
        assert!(timer.poll(10.0));
    }
}
