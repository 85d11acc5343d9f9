//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before retrying after attempt `attempt` (zero-based) failed:
/// `2^attempt` units plus uniform jitter in `[0, unit)`.
pub fn calculate_backoff(attempt: u32, unit: Duration) -> Duration {
    let base = base_backoff(attempt, unit);

    let unit_nanos = unit.as_nanos().min(u64::MAX as u128) as u64;
    let jitter = if unit_nanos > 0 {
        Duration::from_nanos(rand::thread_rng().gen_range(0..unit_nanos))
    } else {
        Duration::ZERO
    };

    base.saturating_add(jitter)
}

/// The deterministic part of the backoff, `2^attempt` units.
pub fn base_backoff(attempt: u32, unit: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    unit.saturating_mul(factor)
}
