//! Cancellable timers driven by an explicit clock.
//!
//! Nothing here sleeps or spawns. The owner asks `fire(now)` from its event
//! loop and reports the next deadline so the loop knows when to wake up.

use std::time::{Duration, Instant};

/// A one-shot timer.
#[derive(Debug, Clone, Default)]
pub struct Timeout {
    deadline: Option<Instant>,
}

impl Timeout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer, replacing any pending deadline.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Disarm. Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once, the first time `now` reaches the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A repeating timer. Missed periods are coalesced into one firing.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    /// A stopped interval; call [`Interval::start`] to run it.
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                self.next = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn timeout_fires_once_at_deadline() {
        let t0 = Instant::now();
        let mut t = Timeout::new();
        t.arm(t0, 100 * MS);

        assert!(!t.fire(t0 + 99 * MS));
        assert!(t.fire(t0 + 100 * MS));
        assert!(!t.fire(t0 + 500 * MS));
        assert!(!t.is_armed());
    }

    #[test]
    fn cancelled_timeout_never_fires() {
        let t0 = Instant::now();
        let mut t = Timeout::new();
        t.arm(t0, 10 * MS);
        assert!(t.cancel());
        assert!(!t.fire(t0 + 20 * MS));
        assert!(!t.cancel());
    }

    #[test]
    fn rearm_replaces_deadline() {
        let t0 = Instant::now();
        let mut t = Timeout::new();
        t.arm(t0, 10 * MS);
        t.arm(t0 + 5 * MS, 10 * MS);
        assert!(!t.fire(t0 + 12 * MS));
        assert!(t.fire(t0 + 15 * MS));
    }

    #[test]
    fn interval_stopped_until_started() {
        let t0 = Instant::now();
        let mut iv = Interval::new(200 * MS);
        assert!(!iv.is_running());
        assert!(!iv.fire(t0 + 1000 * MS));

        iv.start(t0);
        assert!(!iv.fire(t0 + 199 * MS));
        assert!(iv.fire(t0 + 200 * MS));
        assert!(!iv.fire(t0 + 300 * MS));
        assert!(iv.fire(t0 + 400 * MS));
    }

    #[test]
    fn interval_coalesces_missed_periods() {
        let t0 = Instant::now();
        let mut iv = Interval::new(200 * MS);
        iv.start(t0);
        assert!(iv.fire(t0 + 1000 * MS));
        assert!(!iv.fire(t0 + 1100 * MS));
        assert_eq!(iv.deadline(), Some(t0 + 1200 * MS));
    }

    #[test]
    fn cancelled_interval_stops() {
        let t0 = Instant::now();
        let mut iv = Interval::new(50 * MS);
        iv.start(t0);
        iv.cancel();
        assert!(!iv.fire(t0 + 100 * MS));
    }
}
