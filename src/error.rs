//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load [`crate::EntityEventsConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid entity events config")]
    Parse(#[from] serde_yaml::Error),

    #[error("broadcast_capacity must be at least 1")]
    ZeroBroadcastCapacity,
}
