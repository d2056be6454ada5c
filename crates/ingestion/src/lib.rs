//! # Ingestion
//!
//! Hand tracking intake.
//!
//! Responsibilities:
//! - Register hand sources (live tracker, scripted mock, recording replay)
//! - Ignore detections delivered after a source is stopped
//! - Backpressure management and drop policy
//! - Hand sets to downstream via async-channel
//!
//! ## Usage
//!
//! ```ignore
//! use ingestion::{MockHandSource, MockScript, TrackingPipeline};
//!
//! let mut pipeline = TrackingPipeline::from_tracking(&blueprint.tracking);
//! pipeline.register_source(Box::new(MockHandSource::new("webcam", MockScript::Lap, 30.0)))?;
//! let rx = pipeline.take_receiver().unwrap();
//! pipeline.start_all();
//! while let Ok(hands) = rx.recv().await {
//!     // interpret
//! }
//! ```

mod adapter;
mod config;
mod error;
mod generic_adapter;
mod mock;
mod pipeline;
mod replay;
mod send;
pub mod synth;

pub use adapter::HandAdapter;
pub use config::{BackpressureConfig, DropPolicy, IngestionMetrics, MetricsSnapshot};
pub use error::{IngestionError, Result};
pub use generic_adapter::GenericHandAdapter;
pub use mock::{MockHandSource, MockScript};
pub use pipeline::TrackingPipeline;
pub use replay::{ReplayConfig, ReplayHandSource, MAX_RECORDING_SPAN_S};
pub use send::IntakeSender;
