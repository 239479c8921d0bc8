//! Coalescing of rapid input changes.
//!
//! A [`Debouncer`] holds the latest pushed value until `delay` has passed
//! without another push. Callers pass the current [`Instant`] in, so the
//! debouncer never reads the clock and never sleeps.
//!
//! ## Examples
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use toon_savings::Debouncer;
//!
//! let start = Instant::now();
//! let mut input = Debouncer::new(Duration::from_millis(500));
//! input.push("{", start);
//! input.push("{}", start + Duration::from_millis(100));
//!
//! assert_eq!(input.take_ready(start + Duration::from_millis(550)), None);
//! assert_eq!(input.take_ready(start + Duration::from_millis(600)), Some("{}"));
//! ```

use std::time::{Duration, Instant};

/// Delay applied by [`Debouncer::default`].
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending value and restarts the delay from `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes ready, if there is one.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    /// Takes the pending value once `delay` has passed since the last push.
    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Takes the pending value without waiting.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Debouncer::new(DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_burst_keeps_latest() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        assert_eq!(d.delay(), ms(500));

        d.push(1, t0);
        d.push(2, t0 + ms(200));
        d.push(3, t0 + ms(400));
        assert_eq!(d.deadline(), Some(t0 + ms(900)));
        assert_eq!(d.take_ready(t0 + ms(899)), None);
        assert_eq!(d.take_ready(t0 + ms(900)), Some(3));
        assert!(!d.is_pending());
        assert_eq!(d.take_ready(t0 + ms(2000)), None);
    }

    #[test]
    fn test_flush() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(50));
        assert_eq!(d.flush(), None::<&str>);
        d.push("x", t0);
        assert_eq!(d.flush(), Some("x"));
        assert_eq!(d.deadline(), None);
    }
}
