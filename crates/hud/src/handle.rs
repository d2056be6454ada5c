//! SinkHandle - one HUD sink behind its own latest-wins queue and worker task
//!
//! HUD frames are whole snapshots. When a slow sink lets its queue fill up,
//! the oldest queued frame is evicted so the sink always catches up to the
//! most recent driving state instead of rendering stale ones.

use std::sync::Arc;

use async_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, trace};

use contracts::{HudFrame, HudSink};

use crate::metrics::SinkMetrics;

/// Handle to a running sink worker
pub struct SinkHandle {
    name: String,
    tx: Sender<HudFrame>,
    /// Producer-side receiver used to evict superseded frames
    evict: Receiver<HudFrame>,
    metrics: Arc<SinkMetrics>,
    worker: JoinHandle<()>,
}

impl SinkHandle {
    /// Spawn the worker task for `sink`
    pub fn spawn<S: HudSink + Send + 'static>(sink: S, queue_capacity: usize) -> Self {
        let name = sink.name().to_string();
        let (tx, rx) = bounded(queue_capacity.max(1));
        let metrics = Arc::new(SinkMetrics::new());

        let worker = tokio::spawn(sink_worker(
            sink,
            rx.clone(),
            Arc::clone(&metrics),
            name.clone(),
        ));

        Self {
            name,
            tx,
            evict: rx,
            metrics,
            worker,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Queue a frame without waiting
    ///
    /// On a full queue the oldest pending frame is evicted and counted as
    /// dropped, then `frame` takes its place. Returns false only when the
    /// worker has exited.
    pub fn try_send(&self, frame: HudFrame) -> bool {
        let frame = match self.tx.try_send(frame) {
            Ok(()) => {
                self.metrics.set_queue_len(self.tx.len());
                return true;
            }
            Err(TrySendError::Full(frame)) => frame,
            Err(TrySendError::Closed(_)) => {
                error!(sink = %self.name, "hud sink worker closed unexpectedly");
                return false;
            }
        };

        match self.evict.try_recv() {
            Ok(stale) => {
                self.metrics.inc_dropped_count();
                trace!(
                    sink = %self.name,
                    stale = stale.frame_id,
                    latest = frame.frame_id,
                    "queue full, superseded hud frame"
                );
            }
            // worker took it meanwhile
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => return false,
        }

        match self.tx.try_send(frame) {
            Ok(()) => {
                self.metrics.set_queue_len(self.tx.len());
                true
            }
            Err(TrySendError::Full(f)) => {
                self.metrics.inc_dropped_count();
                trace!(sink = %self.name, frame_id = f.frame_id, "queue still full, frame dropped");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Close the queue and wait for the worker to drain, flush and close
    #[instrument(name = "hud_sink_handle_shutdown", skip(self), fields(sink = %self.name))]
    pub async fn shutdown(self) {
        let Self {
            name, tx, worker, ..
        } = self;
        tx.close();
        if let Err(e) = worker.await {
            error!(sink = %name, error = ?e, "hud sink worker panicked");
        }
        debug!(sink = %name, "sink handle shutdown complete");
    }
}

#[instrument(name = "hud_sink_worker", skip(sink, rx, metrics), fields(sink = %name))]
async fn sink_worker<S: HudSink>(
    mut sink: S,
    rx: Receiver<HudFrame>,
    metrics: Arc<SinkMetrics>,
    name: String,
) {
    debug!("hud sink worker started");

    while let Ok(frame) = rx.recv().await {
        metrics.set_queue_len(rx.len());

        match sink.write(&frame).await {
            Ok(()) => metrics.record_write(frame.frame_id),
            Err(e) => {
                metrics.inc_failure_count();
                error!(frame_id = frame.frame_id, error = %e, "hud write failed");
            }
        }
    }

    if let Err(e) = sink.flush().await {
        error!(error = %e, "flush failed on shutdown");
    }
    if let Err(e) = sink.close().await {
        error!(error = %e, "close failed on shutdown");
    }

    debug!("hud sink worker stopped");
}
