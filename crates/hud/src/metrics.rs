//! Per-sink counters

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

const NO_FRAME: u64 = u64::MAX;

/// Counters for one HUD sink, shared between handle and worker
#[derive(Debug)]
pub struct SinkMetrics {
    queue_len: AtomicUsize,
    write_count: AtomicU64,
    failure_count: AtomicU64,
    dropped_count: AtomicU64,
    last_frame_id: AtomicU64,
}

impl Default for SinkMetrics {
    fn default() -> Self {
        Self {
            queue_len: AtomicUsize::new(0),
            write_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            last_frame_id: AtomicU64::new(NO_FRAME),
        }
    }
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Count a successful write of `frame_id`
    pub fn record_write(&self, frame_id: u64) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.last_frame_id.store(frame_id, Ordering::Relaxed);
    }

    /// Most recent frame the sink accepted
    pub fn last_frame_id(&self) -> Option<u64> {
        match self.last_frame_id.load(Ordering::Relaxed) {
            NO_FRAME => None,
            id => Some(id),
        }
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            write_count: self.write_count(),
            failure_count: self.failure_count(),
            dropped_count: self.dropped_count(),
            last_frame_id: self.last_frame_id(),
        }
    }
}

/// Point-in-time copy of sink counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub write_count: u64,
    pub failure_count: u64,
    pub dropped_count: u64,
    pub last_frame_id: Option<u64>,
}
