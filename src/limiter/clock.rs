//! Wall-clock sources for the admission controller
//!
//! Windows are aligned to wall-clock second and minute boundaries, so the
//! clock hands out `DateTime<Utc>` rather than monotonic instants.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Time source used by [`AdmissionController`](super::AdmissionController)
#[async_trait]
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the calling task for `duration`
    async fn sleep(&self, duration: Duration);

    /// Suspend the calling task until `deadline`
    ///
    /// Returns immediately if the deadline has already passed.
    async fn sleep_until(&self, deadline: DateTime<Utc>) {
        let remaining = (deadline - self.now()).to_std().unwrap_or_default();
        if !remaining.is_zero() {
            self.sleep(remaining).await;
        }
    }
}

/// Production clock backed by `Utc::now()` and `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Virtual clock whose time only moves when someone sleeps on it
///
/// Sleeping advances the shared time instead of waiting, which makes
/// admission schedules fully deterministic. All clones share one timeline;
/// concurrent sleepers move it to the latest requested deadline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock starting at `start`
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Move time forward by `duration`
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += duration;
    }

    /// Move time forward to `at`; earlier values are ignored
    pub fn advance_to(&self, at: DateTime<Utc>) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if at > *current {
            *current = at;
        }
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
        tokio::task::yield_now().await;
    }

    async fn sleep_until(&self, deadline: DateTime<Utc>) {
        self.advance_to(deadline);
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn manual_clock_sleep_advances_time() {
        let clock = ManualClock::new(epoch());
        clock.sleep(Duration::from_millis(1500)).await;
        assert_eq!(clock.now(), epoch() + Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn manual_clock_sleep_until_never_goes_backwards() {
        let clock = ManualClock::new(epoch() + Duration::from_secs(10));
        clock.sleep_until(epoch()).await;
        assert_eq!(clock.now(), epoch() + Duration::from_secs(10));
    }

    #[tokio::test]
    async fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(epoch());
        let other = clock.clone();
        other.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), epoch() + Duration::from_secs(5));
    }

    #[tokio::test]
    async fn system_clock_sleep_until_past_deadline_returns() {
        let clock = SystemClock;
        let past = clock.now() - chrono::TimeDelta::seconds(1);
        tokio::time::timeout(Duration::from_millis(100), clock.sleep_until(past))
            .await
            .expect("sleep_until on a past deadline should not block");
    }
}
