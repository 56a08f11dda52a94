//! Dual-window admission control for outbound webhook calls
//!
//! The platform throttles custom bots per second and per minute. Every send
//! first calls [`AdmissionController::acquire`], which suspends the caller
//! until both windows have room for one more call.
//!
//! Windows are aligned to wall-clock boundaries: a call is charged to the
//! second (and minute) its reading of the clock falls in. When either window
//! is spent the caller sleeps until the next boundary and re-evaluates both
//! windows from scratch, since a long wait on one window can carry the call
//! past the boundary it was granted in by the other.
//!
//! Minute truncation assumes every caller shares this process's wall clock.

mod bucket;
mod clock;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use governor::Quota;
pub use bucket::{Reservation, TokenBucket};
pub use clock::{Clock, ManualClock, SystemClock};

use crate::{Error, Result};

/// Default calls admitted per second
pub const DEFAULT_PER_SECOND: i64 = 5;

/// Default calls admitted per minute
pub const DEFAULT_PER_MINUTE: i64 = 100;

/// Largest per-second capacity whose replenish interval is still at least 1ns
pub const MAX_PER_SECOND: u32 = 1_000_000_000;

/// Per-second and per-minute capacities
///
/// `0` selects the default for that window; any value `<= -1` in either
/// field turns admission control off entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Calls admitted per wall-clock second
    pub per_second: i64,
    /// Calls admitted per wall-clock minute
    pub per_minute: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: DEFAULT_PER_SECOND,
            per_minute: DEFAULT_PER_MINUTE,
        }
    }
}

impl RateLimitConfig {
    /// Configuration that admits every call immediately
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            per_second: -1,
            per_minute: -1,
        }
    }

    /// Whether admission control is active
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.per_second > -1 && self.per_minute > -1
    }

    /// Capacities with `0` replaced by the defaults
    #[must_use]
    pub const fn normalized(self) -> Self {
        Self {
            per_second: if self.per_second == 0 {
                DEFAULT_PER_SECOND
            } else {
                self.per_second
            },
            per_minute: if self.per_minute == 0 {
                DEFAULT_PER_MINUTE
            } else {
                self.per_minute
            },
        }
    }
}

#[derive(Debug)]
struct Windows {
    second: TokenBucket,
    minute: TokenBucket,
}

/// Blocks outbound calls until both the second and minute windows admit them
///
/// Safe to share between tasks (wrap in `Arc`); concurrent callers each run
/// their own admission loop against the shared buckets. No FIFO ordering is
/// promised between waiters.
#[derive(Debug)]
pub struct AdmissionController {
    windows: Option<Windows>,
    clock: Arc<dyn Clock>,
}

impl AdmissionController {
    /// Create a controller driven by the system clock
    ///
    /// # Errors
    ///
    /// Returns error if a capacity does not fit in a `u32`
    pub fn new(config: RateLimitConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a controller driven by the given clock
    ///
    /// # Errors
    ///
    /// Returns error if a capacity does not fit in a `u32`
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if !config.is_enabled() {
            tracing::debug!("admission control disabled");
            return Ok(Self {
                windows: None,
                clock,
            });
        }

        let config = config.normalized();
        let per_second = capacity("per_second", config.per_second, MAX_PER_SECOND)?;
        let per_minute = capacity("per_minute", config.per_minute, u32::MAX)?;

        Ok(Self {
            windows: Some(Windows {
                second: TokenBucket::new(Quota::per_second(per_second)),
                minute: TokenBucket::new(Quota::per_minute(per_minute)),
            }),
            clock,
        })
    }

    /// Controller that never waits
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            windows: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Whether calls are actually being limited
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.windows.is_some()
    }

    /// Wait until one more call is admitted by both windows
    ///
    /// Returns the instant the call was charged at: the clock reading taken
    /// for the successful attempt plus any reservation delay.
    ///
    /// # Errors
    ///
    /// Returns error if a window can never grant a token
    pub async fn acquire(&self) -> Result<DateTime<Utc>> {
        let Some(windows) = &self.windows else {
            return Ok(self.clock.now());
        };

        loop {
            let now = self.clock.now();
            let mut released = now;

            let ts = truncate_to_second(now);
            match windows.second.reserve_at(ts) {
                Reservation::Exhausted => {
                    let wake = ts + TimeDelta::seconds(1);
                    tracing::trace!(%now, %wake, "second window spent, waiting");
                    self.clock.sleep_until(wake).await;
                    continue;
                }
                Reservation::Unsatisfiable => {
                    return Err(Error::Admission(
                        "second window: cannot grant token".to_string(),
                    ));
                }
                Reservation::Granted { delay, .. } => {
                    self.pause(delay).await;
                    released += delay;
                }
            }

            let tm = truncate_to_minute(now);
            match windows.minute.reserve_at(tm) {
                Reservation::Exhausted => {
                    let wake = tm + TimeDelta::minutes(1);
                    tracing::trace!(%now, %wake, "minute window spent, waiting");
                    self.clock.sleep_until(wake).await;
                    continue;
                }
                Reservation::Unsatisfiable => {
                    return Err(Error::Admission(
                        "minute window: cannot grant token".to_string(),
                    ));
                }
                Reservation::Granted { delay, .. } => {
                    self.pause(delay).await;
                    released += delay;
                }
            }

            return Ok(released);
        }
    }

    /// [`acquire`](Self::acquire) with an upper bound on the wait
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdmissionTimeout`] if `limit` elapses first, or any
    /// error from `acquire`
    pub async fn acquire_timeout(&self, limit: Duration) -> Result<DateTime<Utc>> {
        tokio::time::timeout(limit, self.acquire())
            .await
            .map_err(|_| Error::AdmissionTimeout(limit))?
    }

    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tracing::trace!(?delay, "reservation delayed");
            self.clock.sleep(delay).await;
        }
    }
}

fn capacity(name: &str, value: i64, max: u32) -> Result<NonZeroU32> {
    u32::try_from(value)
        .ok()
        .filter(|&n| n <= max)
        .and_then(NonZeroU32::new)
        .ok_or_else(|| Error::Config(format!("rate limit {name} out of range: {value}")))
}

fn truncate_to_second(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(TimeDelta::seconds(1)).unwrap_or(at)
}

fn truncate_to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(TimeDelta::minutes(1)).unwrap_or(at)
}
