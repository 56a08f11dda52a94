//! Token bucket keyed on explicit timestamps
//!
//! Unlike `governor::RateLimiter`, which always measures against its own
//! clock, admission needs to ask "how many tokens at the start of this
//! window?" and reserve against that instant. The bucket is therefore sized
//! from a [`governor::Quota`] but keeps its own accounting.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use governor::Quota;

/// Outcome of a reservation attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reservation {
    /// No whole or partial token left at the requested instant; nothing was consumed
    Exhausted,
    /// One token was consumed, effective at `at`, usable after `delay`
    Granted {
        /// Instant the reservation was accounted at
        at: DateTime<Utc>,
        /// Additional wait before the token may be used
        delay: Duration,
    },
    /// The request can never be satisfied with this quota
    Unsatisfiable,
}

#[derive(Debug)]
struct State {
    tokens: f64,
    last: Option<DateTime<Utc>>,
}

/// Mutex-guarded token bucket
#[derive(Debug)]
pub struct TokenBucket {
    burst: f64,
    interval: Duration,
    state: Mutex<State>,
}

impl TokenBucket {
    /// Create a full bucket from a quota
    #[must_use]
    pub fn new(quota: Quota) -> Self {
        let burst = f64::from(quota.burst_size().get());
        Self {
            burst,
            interval: quota.replenish_interval(),
            state: Mutex::new(State {
                tokens: burst,
                last: None,
            }),
        }
    }

    /// Maximum number of tokens the bucket can hold
    #[must_use]
    pub const fn burst(&self) -> f64 {
        self.burst
    }

    /// Tokens that would be available at `at`, without consuming any
    #[must_use]
    pub fn tokens_at(&self, at: DateTime<Utc>) -> f64 {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let (_, tokens) = self.advance(&state, at);
        tokens
    }

    /// Atomically check for and reserve one token at `at`
    ///
    /// A timestamp older than the last reservation is clamped forward to it,
    /// so a caller with a stale reading cannot refill an already spent window.
    pub fn reserve_at(&self, at: DateTime<Utc>) -> Reservation {
        if self.burst < 1.0 || self.interval.is_zero() {
            return Reservation::Unsatisfiable;
        }

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let (at, tokens) = self.advance(&state, at);
        if tokens <= 0.0 {
            return Reservation::Exhausted;
        }

        let remaining = tokens - 1.0;
        let delay = if remaining < 0.0 {
            self.interval.mul_f64(-remaining)
        } else {
            Duration::ZERO
        };

        state.tokens = remaining;
        state.last = Some(at);
        drop(state);

        Reservation::Granted { at, delay }
    }

    fn advance(&self, state: &State, at: DateTime<Utc>) -> (DateTime<Utc>, f64) {
        let Some(last) = state.last else {
            return (at, state.tokens);
        };
        let at = at.max(last);
        let elapsed = (at - last).to_std().unwrap_or_default();
        let refill = elapsed.as_secs_f64() / self.interval.as_secs_f64();
        (at, (state.tokens + refill).min(self.burst))
    }
}
