//! HandSource trait - hand tracking event source abstraction
//!
//! Decouples the intake pipeline from the concrete landmark tracker.
//! Live trackers, scripted mocks and recording replays share this API.

use std::sync::Arc;

use crate::{ContractError, HandSet};

/// Detection callback type
///
/// Invoked once per processed camera frame with the tracker's hand set.
pub type HandSetCallback = Arc<dyn Fn(HandSet) + Send + Sync>;

/// Hand tracking source trait
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn HandSource> = make_source();
/// source.listen(Arc::new(|hands| {
///     println!("{} hands", hands.len());
/// }))?;
/// // ... drive ...
/// source.stop();
/// ```
pub trait HandSource: Send + Sync {
    /// Source identifier
    fn source_id(&self) -> &str;

    /// Register the detection callback and start producing hand sets
    ///
    /// Repeated calls while listening are no-ops.
    ///
    /// # Errors
    /// `ContractError::TrackerUnavailable` when the tracker cannot be
    /// loaded or its input cannot be opened.
    fn listen(&self, callback: HandSetCallback) -> Result<(), ContractError>;

    /// Stop producing hand sets
    ///
    /// Detections already in flight may still reach the callback; the
    /// intake side must ignore them.
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
