//! # HUD
//!
//! HUD output fan-out.
//!
//! Responsibilities:
//! - Consume `HudFrame`s from the frame loop
//! - Fan out to multiple sinks (log, JSON-lines file, UDP)
//! - Isolate slow sinks so the frame loop never blocks

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{HudFrame, HudSink};
pub use dispatcher::{create_dispatcher, HudDispatcher, HudDispatcherBuilder};
pub use error::HudError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{FileSink, LogSink, NetworkSink};
