//! Tracking pipeline main entry

use std::collections::HashMap;
use std::sync::Arc;

use async_channel::{bounded, Receiver};
use contracts::{HandSet, HandSource, TrackingConfig};
use tracing::{debug, error, info, instrument};

use crate::adapter::HandAdapter;
use crate::config::{BackpressureConfig, IngestionMetrics};
use crate::error::{IngestionError, Result};
use crate::generic_adapter::GenericHandAdapter;
use crate::send::IntakeSender;

/// Tracking pipeline
///
/// Owns the registered hand sources and the bounded channel they feed.
/// A source whose tracker fails to start is logged and skipped; the
/// downstream consumer simply stops seeing new hand sets.
pub struct TrackingPipeline {
    adapters: HashMap<String, Box<dyn HandAdapter>>,

    metrics: Arc<IngestionMetrics>,

    sender: IntakeSender,

    rx: Option<Receiver<HandSet>>,
}

impl TrackingPipeline {
    pub fn new(config: BackpressureConfig) -> Self {
        let (tx, rx) = bounded(config.channel_capacity);
        Self {
            adapters: HashMap::new(),
            metrics: Arc::new(IngestionMetrics::new()),
            sender: IntakeSender::new(tx, rx.clone(), config.drop_policy),
            rx: Some(rx),
        }
    }

    pub fn from_tracking(tracking: &TrackingConfig) -> Self {
        Self::new(BackpressureConfig::from_tracking(tracking))
    }

    #[instrument(
        name = "tracking_register_source",
        skip(self, source),
        fields(source_id = %source.source_id())
    )]
    pub fn register_source(&mut self, source: Box<dyn HandSource>) -> Result<()> {
        let source_id = source.source_id().to_string();
        if self.adapters.contains_key(&source_id) {
            return Err(IngestionError::AlreadyRegistered { source_id });
        }
        debug!(source_id = %source_id, "registered hand source");
        self.adapters
            .insert(source_id, Box::new(GenericHandAdapter::new(source)));
        Ok(())
    }

    /// Start every registered source, returning how many are listening
    #[instrument(name = "tracking_start_all", skip(self))]
    pub fn start_all(&self) -> usize {
        info!(count = self.adapters.len(), "starting hand sources");
        let mut started = 0;
        for (source_id, adapter) in &self.adapters {
            if adapter.is_listening() {
                started += 1;
                continue;
            }
            debug!(source_id = %source_id, "starting adapter");
            match adapter.start(self.sender.clone(), self.metrics.clone()) {
                Ok(()) => started += 1,
                Err(e) => {
                    error!(source_id = %source_id, error = %e, "hand tracker unavailable");
                }
            }
        }
        started
    }

    #[instrument(name = "tracking_stop_all", skip(self))]
    pub fn stop_all(&self) {
        for (source_id, adapter) in &self.adapters {
            if adapter.is_listening() {
                debug!(source_id = %source_id, "stopping adapter");
                adapter.stop();
            }
        }
    }

    /// Get the hand set stream
    ///
    /// Can only be called once, subsequent calls return None
    pub fn take_receiver(&mut self) -> Option<Receiver<HandSet>> {
        self.rx.take()
    }

    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    pub fn source_count(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_source_listening(&self, source_id: &str) -> bool {
        self.adapters
            .get(source_id)
            .map(|a| a.is_listening())
            .unwrap_or(false)
    }
}

impl Drop for TrackingPipeline {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockHandSource, MockScript};
    use std::time::Duration;

    #[test]
    fn test_take_receiver_once() {
        let mut pipeline = TrackingPipeline::new(BackpressureConfig::default());
        assert!(pipeline.take_receiver().is_some());
        assert!(pipeline.take_receiver().is_none());
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let mut pipeline = TrackingPipeline::new(BackpressureConfig::default());
        pipeline
            .register_source(Box::new(MockHandSource::new("cam", MockScript::Straight, 50.0)))
            .unwrap();
        let err = pipeline
            .register_source(Box::new(MockHandSource::new("cam", MockScript::Lap, 50.0)))
            .unwrap_err();
        assert!(matches!(err, IngestionError::AlreadyRegistered { .. }));
        assert_eq!(pipeline.source_count(), 1);
    }

    #[test]
    fn test_unavailable_tracker_is_skipped() {
        let mut pipeline = TrackingPipeline::new(BackpressureConfig::default());
        pipeline
            .register_source(Box::new(MockHandSource::unavailable("webcam")))
            .unwrap();
        assert_eq!(pipeline.start_all(), 0);
        assert!(!pipeline.is_source_listening("webcam"));
        assert_eq!(pipeline.metrics().snapshot().tracker_errors, 1);
    }

    #[test]
    fn test_mock_source_feeds_channel() {
        let mut pipeline = TrackingPipeline::new(BackpressureConfig::new(64, Default::default()));
        pipeline
            .register_source(Box::new(MockHandSource::new("cam", MockScript::Straight, 200.0)))
            .unwrap();
        let rx = pipeline.take_receiver().unwrap();

        assert_eq!(pipeline.start_all(), 1);
        std::thread::sleep(Duration::from_millis(100));
        pipeline.stop_all();

        assert!(!pipeline.is_source_listening("cam"));
        let first = rx.try_recv().unwrap();
        assert_eq!(first.len(), 2);
        assert!(pipeline.metrics().snapshot().hand_sets_received > 0);
    }
}
