//! Session orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{InputSource, Session, SessionConfig};
pub use stats::SessionStats;
