//! Bounded polling primitive used by every wait in the crate.

use std::{
    fmt::Display,
    thread,
    time::{Duration, Instant},
};

use crate::error::{Error, Result};

/// Smallest poll interval accepted; shorter intervals are clamped up.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default poll interval when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Timeout and poll cadence for a bounded wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total time allowed for the wait.
    pub timeout: Duration,
    /// Pause between observations.
    pub interval: Duration,
}

impl RetryPolicy {
    /// Policy with the given timeout and [`DEFAULT_POLL_INTERVAL`].
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Replace the poll interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn effective_interval(&self) -> Duration {
        self.interval.max(MIN_POLL_INTERVAL)
    }
}

/// Outcome of [`poll_until`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Polled<T> {
    /// The predicate held for this value.
    Satisfied(T),
    /// The deadline passed; `last` is the final observation.
    Expired {
        /// Last observed value.
        last: T,
        /// Time spent polling.
        elapsed: Duration,
    },
}

impl<T> Polled<T> {
    /// The observed value regardless of outcome.
    pub fn value(&self) -> &T {
        match self {
            Self::Satisfied(v) | Self::Expired { last: v, .. } => v,
        }
    }

    /// The observed value regardless of outcome.
    pub fn into_value(self) -> T {
        match self {
            Self::Satisfied(v) | Self::Expired { last: v, .. } => v,
        }
    }

    /// True when the predicate held before the deadline.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied(_))
    }
}

impl<T: Display> Polled<T> {
    /// Turn expiry into [`Error::Timeout`] carrying the last observed value.
    pub fn into_result(self, condition: &'static str) -> Result<T> {
        match self {
            Self::Satisfied(v) => Ok(v),
            Self::Expired { last, elapsed } => Err(Error::Timeout {
                condition,
                elapsed,
                last: last.to_string(),
            }),
        }
    }
}

/// Poll `produce` until `done` accepts a value or `policy.timeout` elapses.
///
/// At least one observation is always made. Sleeps never extend past the
/// deadline, so the wait overruns it by at most one observation. Producer
/// errors abort the wait immediately.
pub fn poll_until<T, P, D>(policy: RetryPolicy, mut produce: P, mut done: D) -> Result<Polled<T>>
where
    P: FnMut() -> Result<T>,
    D: FnMut(&T) -> bool,
{
    let start = Instant::now();
    let deadline = start
        .checked_add(policy.timeout)
        .unwrap_or_else(|| start + Duration::from_secs(86_400));
    let interval = policy.effective_interval();

    loop {
        let value = produce()?;
        if done(&value) {
            return Ok(Polled::Satisfied(value));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(Polled::Expired {
                last: value,
                elapsed: start.elapsed(),
            });
        }
        thread::sleep(interval.min(deadline.saturating_duration_since(now)));
    }
}

/// Boolean variant: poll `check` until it returns true. Returns whether it did.
pub fn retry_until<F>(policy: RetryPolicy, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    match poll_until(policy, || Ok(check()), |ok| *ok) {
        Ok(polled) => polled.is_satisfied(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn fast(timeout_ms: u64) -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(timeout_ms)).with_interval(Duration::from_millis(5))
    }

    #[test]
    fn returns_first_satisfying_value() {
        let n = Cell::new(0);
        let out = poll_until(
            fast(1000),
            || {
                n.set(n.get() + 1);
                Ok(n.get())
            },
            |v| *v >= 3,
        )
        .unwrap();
        assert_eq!(out, Polled::Satisfied(3));
        assert_eq!(n.get(), 3);
    }

    #[test]
    fn expiry_keeps_last_value() {
        let out = poll_until(fast(30), || Ok("NotResponding"), |v| *v != "NotResponding").unwrap();
        match out {
            Polled::Expired { last, elapsed } => {
                assert_eq!(last, "NotResponding");
                assert!(elapsed >= Duration::from_millis(30));
            }
            other => panic!("expected expiry, got {other:?}"),
        }
    }

    #[test]
    fn into_result_maps_to_timeout() {
        let err = poll_until(fast(10), || Ok(7), |_| false)
            .unwrap()
            .into_result("seven")
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { condition: "seven", ref last, .. } if last == "7"));
    }

    #[test]
    fn zero_interval_does_not_spin() {
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::new(Duration::from_millis(20)).with_interval(Duration::ZERO);
        let _ = poll_until(
            policy,
            || {
                calls.set(calls.get() + 1);
                Ok(())
            },
            |_| false,
        );
        // 1 ms minimum interval bounds the observation count.
        assert!(calls.get() <= 25, "made {} observations", calls.get());
    }

    #[test]
    fn stops_within_one_interval_of_deadline() {
        let policy =
            RetryPolicy::new(Duration::from_millis(50)).with_interval(Duration::from_millis(40));
        let start = Instant::now();
        assert!(!retry_until(policy, || false));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(50 + 40 + 30), "took {elapsed:?}");
    }

    #[test]
    fn zero_timeout_observes_once() {
        let calls = Cell::new(0u32);
        let ok = retry_until(RetryPolicy::new(Duration::ZERO), || {
            calls.set(calls.get() + 1);
            true
        });
        assert!(ok);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn producer_error_aborts() {
        let calls = Cell::new(0u32);
        let res: Result<Polled<()>> = poll_until(
            fast(1000),
            || {
                calls.set(calls.get() + 1);
                Err(Error::Unavailable)
            },
            |_| true,
        );
        assert!(matches!(res, Err(Error::Unavailable)));
        assert_eq!(calls.get(), 1);
    }
}
