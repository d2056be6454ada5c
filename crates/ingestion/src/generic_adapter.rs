//! Generic hand adapter
//!
//! Wraps any `HandSource` so the pipeline treats live trackers, mocks and
//! replays the same way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::{ContractError, HandSetCallback, HandSource};
use tracing::{debug, trace};

use crate::adapter::HandAdapter;
use crate::config::IngestionMetrics;
use crate::send::IntakeSender;

/// Adapts a `HandSource` to `HandAdapter`
///
/// The listening flag is owned here, not by the source: anything the
/// source delivers after `stop` is counted and discarded.
pub struct GenericHandAdapter {
    source_id: String,
    source: Box<dyn HandSource>,
    listening: Arc<AtomicBool>,
}

impl GenericHandAdapter {
    pub fn new(source: Box<dyn HandSource>) -> Self {
        Self {
            source_id: source.source_id().to_string(),
            source,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl HandAdapter for GenericHandAdapter {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn start(&self, tx: IntakeSender, metrics: Arc<IngestionMetrics>) -> Result<(), ContractError> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let source_id = self.source_id.clone();
        let listening = self.listening.clone();
        let cb_metrics = metrics.clone();

        debug!(source_id = %source_id, "starting hand adapter");

        let callback: HandSetCallback = Arc::new(move |hands| {
            if !listening.load(Ordering::Relaxed) {
                cb_metrics.record_late();
                return;
            }

            cb_metrics.record_received();
            trace!(source_id = %source_id, hands = hands.len(), "hand set received");
            tx.send(hands, &cb_metrics, &source_id);
        });

        if let Err(e) = self.source.listen(callback) {
            self.listening.store(false, Ordering::SeqCst);
            metrics.record_tracker_error();
            return Err(e);
        }
        Ok(())
    }

    fn stop(&self) {
        if self.listening.swap(false, Ordering::SeqCst) {
            debug!(source_id = %self.source_id, "stopping hand adapter");
            self.source.stop();
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}
