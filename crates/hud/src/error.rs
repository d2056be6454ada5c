use contracts::{ContractError, HudSinkConfig, HudSinkType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HudError {
    /// A configured sink could not be opened; the session does not start
    #[error("cannot open {sink_type:?} HUD sink '{name}': {source}")]
    SinkCreation {
        name: String,
        sink_type: HudSinkType,
        #[source]
        source: ContractError,
    },
}

impl HudError {
    pub fn sink_creation(config: &HudSinkConfig, source: ContractError) -> Self {
        Self::SinkCreation {
            name: config.name.clone(),
            sink_type: config.sink_type,
            source,
        }
    }

    /// Name of the sink that failed
    pub fn sink_name(&self) -> &str {
        match self {
            Self::SinkCreation { name, .. } => name,
        }
    }
}
