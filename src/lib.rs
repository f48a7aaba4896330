//! Entity Events
//!
//! Re-emits a host's entity save hooks as two named events on a synchronous
//! publish/subscribe bus:
//! - `entity_events.entity_pre_save` before an entity is persisted
//! - `entity_events.entity_post_save` after it was persisted
//!
//! Listeners subscribe by name and receive an [`events::EntitySaveEvent`]
//! borrowing the entity for the duration of the dispatch.

pub mod entity;
pub mod error;
pub mod events;
pub mod hooks;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use entity::{Bundleable, Entity};
pub use error::ConfigError;
pub use events::{
    listener_fn, BroadcastListener, EntityDispatcher, EntityEventListener, EntitySaveEvent,
    EventBus, EventDispatcher, ListenerId, Propagation, SaveEventRecord, SavePhase,
    ENTITY_POST_SAVE, ENTITY_PRE_SAVE,
};
pub use hooks::{EntitySaveHooks, SaveLifecycle};

use serde::Deserialize;
use std::path::Path;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the host hook adapter.
///
/// Usually embedded in the host's own YAML config:
///
/// ```yaml
/// enabled: true
/// ignored_entity_types: [cache_entry]
/// broadcast_capacity: 1024
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EntityEventsConfig {
    /// Master switch; when false the hooks do not dispatch anything
    pub enabled: bool,
    /// Entity types whose saves are not re-emitted
    pub ignored_entity_types: Vec<String>,
    /// Channel capacity for [`BroadcastListener`]s built from this config
    pub broadcast_capacity: usize,
}

impl Default for EntityEventsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ignored_entity_types: Vec::new(),
            broadcast_capacity: events::DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl EntityEventsConfig {
    /// Parse from a YAML document. Missing keys take their defaults; a zero
    /// `broadcast_capacity` is rejected.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        if config.broadcast_capacity == 0 {
            return Err(ConfigError::ZeroBroadcastCapacity);
        }
        Ok(config)
    }

    /// Load from a YAML file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_yaml_str(&contents)?;
                tracing::info!("Loaded entity events config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Whether saves of `entity_type_id` are skipped
    pub fn is_ignored(&self, entity_type_id: &str) -> bool {
        self.ignored_entity_types
            .iter()
            .any(|ignored| ignored == entity_type_id)
    }

    /// Broadcast bridge sized from this config
    pub fn broadcast_listener(&self) -> BroadcastListener {
        BroadcastListener::new(self.broadcast_capacity)
    }
}

// ============================================================================
// Tests
// ============================================================================
