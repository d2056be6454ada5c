//! HudDispatcher - fans HUD frames out to every configured sink

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use contracts::{HudFrame, HudSinkConfig, HudSinkType};

use crate::error::HudError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{FileSink, LogSink, NetworkSink};

/// Builds sink handles from config, then the dispatcher
pub struct HudDispatcherBuilder {
    sinks: Vec<HudSinkConfig>,
    input_rx: mpsc::Receiver<HudFrame>,
}

impl HudDispatcherBuilder {
    pub fn new(sinks: Vec<HudSinkConfig>, input_rx: mpsc::Receiver<HudFrame>) -> Self {
        Self { sinks, input_rx }
    }

    /// Create every sink; the first failure aborts the build
    #[instrument(name = "hud_dispatcher_build", skip(self), fields(sink_count = self.sinks.len()))]
    pub async fn build(self) -> Result<HudDispatcher, HudError> {
        let mut handles = Vec::with_capacity(self.sinks.len());
        for sink_config in &self.sinks {
            handles.push(create_sink_handle(sink_config).await?);
        }

        Ok(HudDispatcher {
            handles,
            input_rx: self.input_rx,
        })
    }
}

#[instrument(
    name = "hud_create_sink_handle",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
async fn create_sink_handle(config: &HudSinkConfig) -> Result<SinkHandle, HudError> {
    match config.sink_type {
        HudSinkType::Log => {
            let sink = LogSink::new(&config.name);
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        HudSinkType::File => {
            let sink = FileSink::from_params(&config.name, &config.params)
                .map_err(|e| HudError::sink_creation(config, e))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        HudSinkType::Network => {
            let sink = NetworkSink::from_params(&config.name, &config.params)
                .await
                .map_err(|e| HudError::sink_creation(config, e))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
    }
}

/// Consumes HUD frames and hands a copy to every sink
pub struct HudDispatcher {
    handles: Vec<SinkHandle>,
    input_rx: mpsc::Receiver<HudFrame>,
}

impl HudDispatcher {
    /// Dispatcher over pre-built handles
    pub fn with_handles(handles: Vec<SinkHandle>, input_rx: mpsc::Receiver<HudFrame>) -> Self {
        Self { handles, input_rx }
    }

    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Run until the input channel closes, then drain and close every sink
    ///
    /// Returns per-sink counters taken after shutdown.
    #[instrument(name = "hud_dispatcher_run", skip(self))]
    pub async fn run(mut self) -> Vec<(String, MetricsSnapshot)> {
        info!(sinks = self.handles.len(), "hud dispatcher started");

        let mut frame_count: u64 = 0;
        while let Some(frame) = self.input_rx.recv().await {
            frame_count += 1;
            for handle in &self.handles {
                handle.try_send(frame.clone());
            }
            if frame_count % 100 == 0 {
                debug!(frames = frame_count, "hud dispatcher progress");
            }
        }

        info!(frames = frame_count, "hud input closed, shutting down sinks");

        let mut summary = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            let name = handle.name().to_string();
            let metrics = std::sync::Arc::clone(handle.metrics());
            handle.shutdown().await;
            summary.push((name, metrics.snapshot()));
        }

        info!("hud dispatcher shutdown complete");
        summary
    }

    pub fn spawn(self) -> JoinHandle<Vec<(String, MetricsSnapshot)>> {
        tokio::spawn(self.run())
    }
}

/// Build a dispatcher from sink configs
#[instrument(name = "hud_dispatcher_create", skip(sink_configs, input_rx))]
pub async fn create_dispatcher(
    sink_configs: Vec<HudSinkConfig>,
    input_rx: mpsc::Receiver<HudFrame>,
) -> Result<HudDispatcher, HudError> {
    HudDispatcherBuilder::new(sink_configs, input_rx)
        .build()
        .await
}
