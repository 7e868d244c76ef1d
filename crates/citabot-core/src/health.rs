// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide delivery health record.
//!
//! One [`DeliveryHealth`] instance is constructed at startup and shared by
//! the ingress path (which stamps activity on every accepted event) and the
//! resilience supervisor (which drives the retry/reinitialize ladder). All
//! fields are atomics so neither side ever blocks the other.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};

/// Shared health state for the delivery layer.
#[derive(Debug)]
pub struct DeliveryHealth {
    /// Unix timestamp (seconds) of the last inbound activity or probe.
    last_activity: AtomicI64,
    /// Whether the last known probe/receipt indicated a working delivery path.
    healthy: AtomicBool,
    /// Consecutive health-probe failures since the last success.
    consecutive_failures: AtomicU32,
}

impl DeliveryHealth {
    /// Creates a health record that is healthy and active as of now.
    pub fn new() -> Self {
        Self {
            last_activity: AtomicI64::new(chrono::Utc::now().timestamp()),
            healthy: AtomicBool::new(true),
            consecutive_failures: AtomicU32::new(0),
        }
    }

    /// Stamps the last-activity timestamp with the current time.
    pub fn record_activity(&self) {
        self.last_activity
            .store(chrono::Utc::now().timestamp(), Ordering::Relaxed);
    }

    /// Seconds elapsed since the last recorded activity.
    pub fn idle_seconds(&self) -> i64 {
        (chrono::Utc::now().timestamp() - self.last_activity.load(Ordering::Relaxed)).max(0)
    }

    pub fn mark_healthy(&self) {
        self.healthy.store(true, Ordering::Relaxed);
    }

    pub fn mark_unhealthy(&self) {
        self.healthy.store(false, Ordering::Relaxed);
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    /// Increments the consecutive-failure counter and returns the new value.
    pub fn record_failure(&self) -> u32 {
        self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    pub fn reset_failures(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for DeliveryHealth {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_healthy_with_zero_failures() {
        let health = DeliveryHealth::new();
        assert!(health.is_healthy());
        assert_eq!(health.failures(), 0);
        assert!(health.idle_seconds() <= 1);
    }

    #[test]
    fn failure_counter_increments_and_resets() {
        let health = DeliveryHealth::new();
        assert_eq!(health.record_failure(), 1);
        assert_eq!(health.record_failure(), 2);
        assert_eq!(health.failures(), 2);
        health.reset_failures();
        assert_eq!(health.failures(), 0);
    }

    #[test]
    fn health_flag_toggles() {
        let health = DeliveryHealth::new();
        health.mark_unhealthy();
        assert!(!health.is_healthy());
        health.mark_healthy();
        assert!(health.is_healthy());
    }
}
