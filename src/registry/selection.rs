//! Candidate filtering for the dispatcher.
//!
//! An open breaker always excludes an endpoint. An unhealthy status excludes
//! it too, except for the last endpoint in priority order, which is tried
//! anyway: refusing every endpoint is worse than one more failed attempt.
//! The last endpoint gets no such exception for an open breaker.

use crate::health::state::HealthStatus;

/// Whether the dispatcher may try an endpoint right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    BreakerOpen,
    Unhealthy,
}

impl Eligibility {
    pub fn is_eligible(self) -> bool {
        self == Eligibility::Eligible
    }

    /// Metric label for the skip reason.
    pub fn as_str(self) -> &'static str {
        match self {
            Eligibility::Eligible => "eligible",
            Eligibility::BreakerOpen => "breaker_open",
            Eligibility::Unhealthy => "unhealthy",
        }
    }
}

pub fn eligibility(status: HealthStatus, breaker_open: bool, is_last: bool) -> Eligibility {
    if breaker_open {
        return Eligibility::BreakerOpen;
    }
    if status == HealthStatus::Unhealthy && !is_last {
        return Eligibility::Unhealthy;
    }
    Eligibility::Eligible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_breaker_excludes_even_the_last_endpoint() {
        assert_eq!(eligibility(HealthStatus::Healthy, true, false), Eligibility::BreakerOpen);
        assert_eq!(eligibility(HealthStatus::Unhealthy, true, true), Eligibility::BreakerOpen);
    }

    #[test]
    fn test_unhealthy_last_endpoint_still_tried() {
        assert_eq!(eligibility(HealthStatus::Unhealthy, false, false), Eligibility::Unhealthy);
        assert_eq!(eligibility(HealthStatus::Unhealthy, false, true), Eligibility::Eligible);
    }

    #[test]
    fn test_skip_reason_labels() {
        assert_eq!(eligibility(HealthStatus::Healthy, true, false).as_str(), "breaker_open");
        assert_eq!(eligibility(HealthStatus::Unhealthy, false, false).as_str(), "unhealthy");
    }

    #[test]
    fn test_degraded_and_unknown_are_eligible() {
        for status in [HealthStatus::Unknown, HealthStatus::Degraded, HealthStatus::Healthy] {
            assert!(eligibility(status, false, false).is_eligible());
        }
    }
}
