//! Hand adapter trait

use std::sync::Arc;

use contracts::ContractError;

use crate::config::IngestionMetrics;
use crate::send::IntakeSender;

/// Bridges one tracker into the shared intake channel
///
/// Implementations:
/// 1. register the tracker callback
/// 2. discard detections delivered after `stop`
/// 3. forward hand sets, applying the drop policy
pub trait HandAdapter: Send + Sync {
    fn source_id(&self) -> &str;

    /// Start forwarding hand sets
    ///
    /// # Errors
    /// The tracker could not be started.
    fn start(&self, tx: IntakeSender, metrics: Arc<IngestionMetrics>) -> Result<(), ContractError>;

    fn stop(&self);

    fn is_listening(&self) -> bool;
}
