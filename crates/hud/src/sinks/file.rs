//! FileSink - appends HUD frames to a JSON-lines file

use chrono::{Local, SecondsFormat, Utc};
use contracts::{ContractError, HudFrame, HudSink};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, error, instrument};

/// Placeholder in `path` replaced by the local start time
const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    pub path: PathBuf,
    /// Append to an existing file instead of truncating
    pub append: bool,
}

impl FileSinkConfig {
    /// Parse `path` (required) and `append` (optional, default false)
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let raw = params
            .get("path")
            .ok_or_else(|| "missing 'path' parameter".to_string())?;

        let path = if raw.contains(TIMESTAMP_PLACEHOLDER) {
            let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
            PathBuf::from(raw.replace(TIMESTAMP_PLACEHOLDER, &stamp))
        } else {
            PathBuf::from(raw)
        };

        let append = match params.get("append").map(String::as_str) {
            None | Some("false") => false,
            Some("true") => true,
            Some(other) => return Err(format!("invalid 'append' value '{other}'")),
        };

        Ok(Self { path, append })
    }
}

#[derive(Serialize)]
struct HudRecord<'a> {
    recorded_at: String,
    #[serde(flatten)]
    frame: &'a HudFrame,
}

/// Sink that records every HUD frame as one JSON object per line
pub struct FileSink {
    name: String,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    lines: u64,
}

impl FileSink {
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(config.append)
            .truncate(!config.append)
            .open(&config.path)?;

        Ok(Self {
            name: name.into(),
            path: config.path,
            writer: Some(BufWriter::new(file)),
            lines: 0,
        })
    }

    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let config =
            FileSinkConfig::from_params(params).map_err(|e| ContractError::sink_write(&name, e))?;
        Ok(Self::new(name, config)?)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn append_line(&mut self, frame: &HudFrame) -> std::io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| std::io::Error::other("file sink already closed"))?;

        let record = HudRecord {
            recorded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            frame,
        };
        serde_json::to_writer(&mut *writer, &record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writer.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }
}

impl HudSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        level = "trace",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.frame_id)
    )]
    async fn write(&mut self, frame: &HudFrame) -> Result<(), ContractError> {
        self.append_line(frame).map_err(|e| {
            error!(sink = %self.name, frame_id = frame.frame_id, error = %e, "write failed");
            ContractError::sink_write(&self.name, e.to_string())
        })
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        if let Some(writer) = self.writer.as_mut() {
            writer
                .flush()
                .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        }
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        }
        debug!(sink = %self.name, path = %self.path.display(), lines = self.lines, "file sink closed");
        Ok(())
    }
}
