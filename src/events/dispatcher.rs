//! Service that publishes entity save events on the injected bus

use super::bus::EventDispatcher;
use super::types::EntitySaveEvent;
use crate::entity::Entity;
use anyhow::Result;
use std::sync::Arc;

/// Builds save events and publishes them under their fixed names.
///
/// Holds nothing but the bus handle. Listener errors come back unchanged.
#[derive(Clone)]
pub struct EntityDispatcher {
    dispatcher: Arc<dyn EventDispatcher>,
}

impl EntityDispatcher {
    pub fn new(dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Publish `entity_events.entity_pre_save`
    pub fn dispatch_pre_save(&self, entity: &dyn Entity, is_new: bool) -> Result<()> {
        let event = EntitySaveEvent::pre_save(entity, is_new);
        self.dispatcher.dispatch(&event, event.name())
    }

    /// Publish `entity_events.entity_post_save`
    pub fn dispatch_post_save(&self, entity: &dyn Entity, is_new: bool) -> Result<()> {
        let event = EntitySaveEvent::post_save(entity, is_new);
        self.dispatcher.dispatch(&event, event.name())
    }
}
