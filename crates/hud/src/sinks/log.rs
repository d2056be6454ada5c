//! LogSink - renders the HUD line through tracing

use contracts::{ContractError, HudFrame, HudSink};
use tracing::{debug, info, instrument};

/// Sink that prints the HUD as a log line
pub struct LogSink {
    name: String,
    last_line: Option<String>,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_line: None,
        }
    }
}

impl HudSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        level = "trace",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.frame_id)
    )]
    async fn write(&mut self, frame: &HudFrame) -> Result<(), ContractError> {
        let line = frame.display_line();
        // Unchanged HUD lines only show at debug level
        if self.last_line.as_deref() == Some(line.as_str()) {
            debug!(sink = %self.name, frame_id = frame.frame_id, "{line}");
        } else {
            info!(
                sink = %self.name,
                frame_id = frame.frame_id,
                elapsed_s = format!("{:.2}", frame.elapsed_s),
                "{line}"
            );
            self.last_line = Some(line);
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, "log sink closed");
        Ok(())
    }
}
