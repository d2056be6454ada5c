//! Backpressure configuration and metrics

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub use contracts::DropPolicy;
use contracts::TrackingConfig;

/// Backpressure configuration
#[derive(Debug, Clone)]
pub struct BackpressureConfig {
    /// Channel capacity
    pub channel_capacity: usize,

    /// Drop policy when full
    pub drop_policy: DropPolicy,
}

impl Default for BackpressureConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
            drop_policy: DropPolicy::DropNewest,
        }
    }
}

impl BackpressureConfig {
    pub fn new(channel_capacity: usize, drop_policy: DropPolicy) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
            drop_policy,
        }
    }

    pub fn from_tracking(tracking: &TrackingConfig) -> Self {
        Self::new(tracking.channel_capacity, tracking.drop_policy)
    }
}

/// Intake counters shared by every registered source
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    pub hand_sets_received: AtomicU64,

    pub hand_sets_dropped: AtomicU64,

    /// Hand sets delivered after their source was stopped
    pub late_hand_sets: AtomicU64,

    /// Sources whose tracker failed to start
    pub tracker_errors: AtomicU64,

    pub queue_len: AtomicUsize,
}

impl IngestionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.hand_sets_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.hand_sets_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_late(&self) {
        self.late_hand_sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tracker_error(&self) {
        self.tracker_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn update_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hand_sets_received: self.hand_sets_received.load(Ordering::Relaxed),
            hand_sets_dropped: self.hand_sets_dropped.load(Ordering::Relaxed),
            late_hand_sets: self.late_hand_sets.load(Ordering::Relaxed),
            tracker_errors: self.tracker_errors.load(Ordering::Relaxed),
            queue_len: self.queue_len.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub hand_sets_received: u64,
    pub hand_sets_dropped: u64,
    pub late_hand_sets: u64,
    pub tracker_errors: u64,
    pub queue_len: usize,
}
