//! Entity save event types

use crate::entity::Entity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event name published before an entity is saved
pub const ENTITY_PRE_SAVE: &str = "entity_events.entity_pre_save";

/// Event name published after an entity is saved
pub const ENTITY_POST_SAVE: &str = "entity_events.entity_post_save";

/// Lifecycle point of a save event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavePhase {
    PreSave,
    PostSave,
}

impl SavePhase {
    /// Fixed event name the phase is published under
    pub fn event_name(self) -> &'static str {
        match self {
            SavePhase::PreSave => ENTITY_PRE_SAVE,
            SavePhase::PostSave => ENTITY_POST_SAVE,
        }
    }
}

impl fmt::Display for SavePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Whether listeners after the current one should still run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    Stop,
}

/// An entity is about to be saved, or was just saved.
///
/// Borrows the entity for the duration of a single dispatch call. Type id and
/// bundle are read from the entity on every access, never cached.
#[derive(Clone, Copy)]
pub struct EntitySaveEvent<'a> {
    phase: SavePhase,
    entity: &'a dyn Entity,
    is_new: bool,
}

impl<'a> EntitySaveEvent<'a> {
    pub fn pre_save(entity: &'a dyn Entity, is_new: bool) -> Self {
        Self {
            phase: SavePhase::PreSave,
            entity,
            is_new,
        }
    }

    pub fn post_save(entity: &'a dyn Entity, is_new: bool) -> Self {
        Self {
            phase: SavePhase::PostSave,
            entity,
            is_new,
        }
    }

    pub fn phase(&self) -> SavePhase {
        self.phase
    }

    /// Name this event is published under
    pub fn name(&self) -> &'static str {
        self.phase.event_name()
    }

    /// The entity being saved
    pub fn entity(&self) -> &'a dyn Entity {
        self.entity
    }

    /// `true` for an insert, `false` for an update
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn entity_type_id(&self) -> &'a str {
        self.entity.entity_type_id()
    }

    /// Bundle of the entity, `None` when its type has no bundles
    pub fn bundle(&self) -> Option<&'a str> {
        self.entity.as_bundleable().map(|b| b.bundle())
    }

    /// Owned snapshot for listeners that keep data past the dispatch call
    pub fn to_record(&self) -> SaveEventRecord {
        SaveEventRecord {
            id: uuid::Uuid::new_v4().to_string(),
            event_name: self.name().to_string(),
            phase: self.phase,
            entity_type_id: self.entity_type_id().to_string(),
            bundle: self.bundle().map(str::to_string),
            entity_id: self.entity.id(),
            is_new: self.is_new,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl fmt::Debug for EntitySaveEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySaveEvent")
            .field("phase", &self.phase)
            .field("entity_type_id", &self.entity_type_id())
            .field("bundle", &self.bundle())
            .field("entity_id", &self.entity.id())
            .field("is_new", &self.is_new)
            .finish()
    }
}

/// Serializable snapshot of a save event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEventRecord {
    /// Unique id of this snapshot
    pub id: String,
    pub event_name: String,
    pub phase: SavePhase,
    pub entity_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub is_new: bool,
    /// ISO 8601 timestamp
    pub timestamp: String,
}
