//! Circuit breaker for endpoint protection.
//!
//! # States
//! - Closed: no entry, endpoint may be selected
//! - Open: entry with an open-until instant in the future, endpoint skipped
//!
//! # State Transitions
//! ```text
//! Closed → Open:   consecutive failures reach the threshold (health tracker)
//! Open → Closed:   open-until passes (cleared lazily on the next check)
//! Open → Closed:   a dispatched call to the endpoint succeeds
//! ```
//!
//! # Design Decisions
//! - Per-endpoint breaker keyed by URL
//! - No timer task: every check doubles as a possible reset
//! - Not synchronized on its own; lives under the health tracker's lock

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct CircuitBreakers {
    open_until: HashMap<String, Instant>,
    timeout: Duration,
}

impl CircuitBreakers {
    pub fn new(timeout: Duration) -> Self {
        Self {
            open_until: HashMap::new(),
            timeout,
        }
    }

    /// Open the breaker for `key` until `now + timeout`.
    pub fn open(&mut self, key: &str, now: Instant) -> Instant {
        let until = now + self.timeout;
        self.open_until.insert(key.to_string(), until);
        until
    }

    /// Close the breaker for `key`. Returns true if it was open.
    pub fn close(&mut self, key: &str) -> bool {
        self.open_until.remove(key).is_some()
    }

    pub fn is_open(&mut self, key: &str) -> bool {
        self.is_open_at(key, Instant::now())
    }

    /// Check the breaker at `now`, clearing an expired entry.
    pub fn is_open_at(&mut self, key: &str, now: Instant) -> bool {
        match self.open_until.get(key) {
            None => false,
            Some(until) if now < *until => true,
            Some(_) => {
                self.open_until.remove(key);
                tracing::debug!(endpoint = %key, "Circuit breaker timeout elapsed, closing");
                false
            }
        }
    }

    pub fn open_count(&self) -> usize {
        self.open_until.len()
    }
}
