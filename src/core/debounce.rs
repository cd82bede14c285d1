//! A cancellable scheduled task for debouncing input.
//!
//! Scheduling a value replaces whatever was pending and restarts the quiet
//! period. At most one value is pending at a time. Time is passed in
//! explicitly so the owner decides where it comes from.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending value and schedule `value` to fire at
    /// `now + delay`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value fires, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Take the pending value if its deadline has passed. Fires at most once
    /// per schedule.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if *at <= now => self.cancel(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("grin", start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(199)), None);
        assert_eq!(debouncer.poll(start + DELAY), Some("grin"));
        assert_eq!(debouncer.poll(start + DELAY * 2), None);
    }

    #[test]
    fn test_reschedule_restarts_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        let mut fired = Vec::new();
        for (i, term) in ["g", "gr", "gri", "grin"].into_iter().enumerate() {
            let now = start + Duration::from_millis(i as u64 * 100);
            if let Some(v) = debouncer.poll(now) {
                fired.push(v);
            }
            debouncer.schedule(term, now);
        }
        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(500)));

        for ms in (300..1000).step_by(50) {
            if let Some(v) = debouncer.poll(start + Duration::from_millis(ms)) {
                fired.push(v);
            }
        }
        assert_eq!(fired, vec!["grin"]);
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(1, start);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.cancel(), Some(1));
        assert_eq!(debouncer.poll(start + DELAY), None);
        assert!(debouncer.deadline().is_none());
    }
}
