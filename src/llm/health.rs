//! Per-provider health tracking.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Minimum failures before a provider can be tripped unhealthy.
pub const DEFAULT_MIN_FAILURES: u64 = 5;
/// Success-rate ceiling (as a percentage) below which a failing provider trips unhealthy.
pub const DEFAULT_MAX_SUCCESS_RATE: f64 = 50.0;

/// Mutable call-outcome bookkeeping for one registered provider.
///
/// Counters are atomic so [`Health::snapshot`] can be read without the
/// router's lock; the router still serializes *writes* to keep the
/// `available` trip decision consistent (see `crate::llm::router`).
#[derive(Debug)]
pub struct Health {
    available: AtomicBool,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    total_latency_ms: AtomicU64,
    last_success_ms: AtomicU64,
    last_error_ms: AtomicU64,
    last_error: parking_lot::Mutex<Option<String>>,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            available: AtomicBool::new(true),
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            last_success_ms: AtomicU64::new(0),
            last_error_ms: AtomicU64::new(0),
            last_error: parking_lot::Mutex::new(None),
        }
    }
}

/// Point-in-time snapshot of a provider's health, safe to hand to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthSnapshot {
    pub available: bool,
    pub success_count: u64,
    pub failure_count: u64,
    pub success_rate: f64,
    pub avg_latency_ms: u64,
    pub last_error: Option<String>,
    /// Unix epoch milliseconds of the last successful call, or 0 if none yet.
    pub last_success_ms: u64,
    /// Unix epoch milliseconds of the last failed call, or 0 if none yet.
    pub last_error_ms: u64,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

impl Health {
    pub fn record_success(&self, latency_ms: u64) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
        self.last_success_ms.store(now_ms(), Ordering::Relaxed);
        self.available.store(true, Ordering::Relaxed);
    }

    /// Records a failure outcome and trips `available` to false if the
    /// configured thresholds are exceeded.
    pub fn record_failure(&self, error: &str, min_failures: u64, max_success_rate: f64) {
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.last_error_ms.store(now_ms(), Ordering::Relaxed);
        *self.last_error.lock() = Some(error.to_string());

        if failures > min_failures && self.success_rate() < max_success_rate {
            self.available.store(false, Ordering::Relaxed);
        }
    }

    pub fn success_rate(&self) -> f64 {
        let success = self.success_count.load(Ordering::Relaxed);
        let failure = self.failure_count.load(Ordering::Relaxed);
        let total = success + failure;
        if total == 0 {
            100.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let rate = (success as f64 / total as f64) * 100.0;
            rate
        }
    }

    pub fn avg_latency_ms(&self) -> u64 {
        let success = self.success_count.load(Ordering::Relaxed);
        self.total_latency_ms
            .load(Ordering::Relaxed)
            .checked_div(success)
            .unwrap_or(0)
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.success_count.store(0, Ordering::Relaxed);
        self.failure_count.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);
        self.last_success_ms.store(0, Ordering::Relaxed);
        self.last_error_ms.store(0, Ordering::Relaxed);
        *self.last_error.lock() = None;
        self.available.store(true, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            available: self.is_available(),
            success_count: self.success_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            success_rate: self.success_rate(),
            avg_latency_ms: self.avg_latency_ms(),
            last_error: self.last_error.lock().clone(),
            last_success_ms: self.last_success_ms.load(Ordering::Relaxed),
            last_error_ms: self.last_error_ms.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_calls_has_full_success_rate() {
        let h = Health::default();
        assert_eq!(h.success_rate(), 100.0);
        assert_eq!(h.avg_latency_ms(), 0);
    }

    #[test]
    fn success_rate_reflects_mixed_outcomes() {
        let h = Health::default();
        h.record_success(10);
        h.record_success(30);
        h.record_failure("boom", DEFAULT_MIN_FAILURES, DEFAULT_MAX_SUCCESS_RATE);
        assert!((h.success_rate() - 66.666_666_666_666_66).abs() < 1e-9);
        assert_eq!(h.avg_latency_ms(), 20);
    }

    #[test]
    fn trips_unavailable_after_threshold() {
        let h = Health::default();
        for _ in 0..6 {
            h.record_failure("boom", DEFAULT_MIN_FAILURES, DEFAULT_MAX_SUCCESS_RATE);
        }
        assert!(!h.is_available());
    }

    #[test]
    fn stays_available_below_failure_threshold() {
        let h = Health::default();
        for _ in 0..5 {
            h.record_failure("boom", DEFAULT_MIN_FAILURES, DEFAULT_MAX_SUCCESS_RATE);
        }
        assert!(h.is_available());
    }

    #[test]
    fn reset_restores_defaults() {
        let h = Health::default();
        for _ in 0..6 {
            h.record_failure("boom", DEFAULT_MIN_FAILURES, DEFAULT_MAX_SUCCESS_RATE);
        }
        h.reset();
        assert!(h.is_available());
        assert_eq!(h.success_rate(), 100.0);
    }

    #[test]
    fn success_after_trip_restores_availability() {
        let h = Health::default();
        for _ in 0..6 {
            h.record_failure("boom", DEFAULT_MIN_FAILURES, DEFAULT_MAX_SUCCESS_RATE);
        }
        assert!(!h.is_available());
        h.record_success(5);
        assert!(h.is_available());
    }

    #[test]
    fn snapshot_carries_last_success_and_error_timestamps() {
        let h = Health::default();
        let fresh = h.snapshot();
        assert_eq!(fresh.last_success_ms, 0);
        assert_eq!(fresh.last_error_ms, 0);

        h.record_failure("boom", DEFAULT_MIN_FAILURES, DEFAULT_MAX_SUCCESS_RATE);
        assert!(h.snapshot().last_error_ms > 0);
        assert_eq!(h.snapshot().last_success_ms, 0);

        h.record_success(5);
        assert!(h.snapshot().last_success_ms > 0);

        h.reset();
        let after_reset = h.snapshot();
        assert_eq!(after_reset.last_success_ms, 0);
        assert_eq!(after_reset.last_error_ms, 0);
    }
}
