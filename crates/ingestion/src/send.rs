//! Bounded intake channel with drop policy

use async_channel::{Receiver, Sender, TrySendError};
use contracts::{DropPolicy, HandSet};
use tracing::{trace, warn};

use crate::config::IngestionMetrics;

/// Producer side of the intake channel
///
/// Holds a receiver clone so `DropOldest` can evict the head of the queue.
#[derive(Debug, Clone)]
pub struct IntakeSender {
    tx: Sender<HandSet>,
    evict: Receiver<HandSet>,
    drop_policy: DropPolicy,
}

impl IntakeSender {
    pub fn new(tx: Sender<HandSet>, evict: Receiver<HandSet>, drop_policy: DropPolicy) -> Self {
        Self {
            tx,
            evict,
            drop_policy,
        }
    }

    pub fn drop_policy(&self) -> DropPolicy {
        self.drop_policy
    }

    /// Send without blocking
    ///
    /// Returns `false` when a hand set was dropped or the channel is closed.
    pub fn send(&self, hands: HandSet, metrics: &IngestionMetrics, source_id: &str) -> bool {
        let sent = match self.tx.try_send(hands) {
            Ok(()) => {
                trace!(source_id = %source_id, "hand set queued");
                true
            }
            Err(TrySendError::Full(hands)) => {
                metrics.record_dropped();
                match self.drop_policy {
                    DropPolicy::DropNewest => {
                        trace!(source_id = %source_id, "hand set dropped (newest)");
                        false
                    }
                    DropPolicy::DropOldest => {
                        if let Ok(stale) = self.evict.try_recv() {
                            trace!(source_id = %source_id, frame_id = ?stale.frame_id, "hand set dropped (oldest)");
                        }
                        self.tx.try_send(hands).is_ok()
                    }
                }
            }
            Err(TrySendError::Closed(_)) => {
                warn!(source_id = %source_id, "intake channel closed");
                false
            }
        };
        metrics.update_queue_len(self.tx.len());
        sent
    }
}
