//! Host hook adapter
//!
//! The only place that knows the host's native save hooks (`presave`,
//! `insert`, `update`). Everything past this point speaks in terms of the two
//! generic events.

use crate::entity::Entity;
use crate::events::EntityDispatcher;
use crate::EntityEventsConfig;
use anyhow::Result;
use std::sync::Arc;
use tracing::trace;

/// Inbound interface called by the host around an entity save
pub trait SaveLifecycle: Send + Sync {
    fn notify_pre_save(&self, entity: &dyn Entity, is_new: bool) -> Result<()>;
    fn notify_post_save(&self, entity: &dyn Entity, is_new: bool) -> Result<()>;
}

impl SaveLifecycle for EntityDispatcher {
    fn notify_pre_save(&self, entity: &dyn Entity, is_new: bool) -> Result<()> {
        self.dispatch_pre_save(entity, is_new)
    }

    fn notify_post_save(&self, entity: &dyn Entity, is_new: bool) -> Result<()> {
        self.dispatch_post_save(entity, is_new)
    }
}

/// Translates the host's save hooks into dispatcher calls, honouring
/// [`EntityEventsConfig`].
#[derive(Clone)]
pub struct EntitySaveHooks {
    dispatcher: Arc<EntityDispatcher>,
    config: EntityEventsConfig,
}

impl EntitySaveHooks {
    pub fn new(dispatcher: Arc<EntityDispatcher>, config: EntityEventsConfig) -> Self {
        Self { dispatcher, config }
    }

    pub fn config(&self) -> &EntityEventsConfig {
        &self.config
    }

    /// Host `presave` hook; the insert/update flag comes from the entity
    pub fn presave(&self, entity: &dyn Entity) -> Result<()> {
        self.notify_pre_save(entity, entity.is_new())
    }

    /// Host `insert` hook
    pub fn insert(&self, entity: &dyn Entity) -> Result<()> {
        self.notify_post_save(entity, true)
    }

    /// Host `update` hook
    pub fn update(&self, entity: &dyn Entity) -> Result<()> {
        self.notify_post_save(entity, false)
    }

    fn should_dispatch(&self, entity: &dyn Entity) -> bool {
        if !self.config.enabled {
            trace!(entity_type = %entity.entity_type_id(), "Entity events disabled, skipping");
            return false;
        }
        if self.config.is_ignored(entity.entity_type_id()) {
            trace!(entity_type = %entity.entity_type_id(), "Entity type ignored, skipping");
            return false;
        }
        true
    }
}

impl SaveLifecycle for EntitySaveHooks {
    fn notify_pre_save(&self, entity: &dyn Entity, is_new: bool) -> Result<()> {
        if !self.should_dispatch(entity) {
            return Ok(());
        }
        self.dispatcher.dispatch_pre_save(entity, is_new)
    }

    fn notify_post_save(&self, entity: &dyn Entity, is_new: bool) -> Result<()> {
        if !self.should_dispatch(entity) {
            return Ok(());
        }
        self.dispatcher.dispatch_post_save(entity, is_new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{listener_fn, EventBus, Propagation, SavePhase, ENTITY_POST_SAVE, ENTITY_PRE_SAVE};
    use crate::test_helpers::{
        article, init_tracing, new_article, recording_listener, seen_log, user_account, SeenLog,
    };

    fn hooks_with(config: EntityEventsConfig) -> (EntitySaveHooks, SeenLog, EventBus) {
        let bus = EventBus::new();
        let log = seen_log();
        bus.subscribe(ENTITY_PRE_SAVE, recording_listener(log.clone(), "pre"));
        bus.subscribe(ENTITY_POST_SAVE, recording_listener(log.clone(), "post"));
        let dispatcher = Arc::new(EntityDispatcher::new(Arc::new(bus.clone())));
        (EntitySaveHooks::new(dispatcher, config), log, bus)
    }

    #[test]
    fn test_presave_uses_entity_is_new() {
        let (hooks, log, _bus) = hooks_with(EntityEventsConfig::default());

        hooks.presave(&new_article("news")).unwrap();
        hooks.presave(&article(4, "news")).unwrap();

        let seen = log.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].phase, SavePhase::PreSave);
        assert!(seen[0].is_new);
        assert!(!seen[1].is_new);
    }

    #[test]
    fn test_insert_and_update_map_to_post_save() {
        let (hooks, log, _bus) = hooks_with(EntityEventsConfig::default());
        let node = article(8, "news");

        hooks.insert(&node).unwrap();
        hooks.update(&node).unwrap();

        let seen = log.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|s| s.phase == SavePhase::PostSave));
        assert!(seen[0].is_new);
        assert!(!seen[1].is_new);
    }

    #[test]
    fn test_disabled_config_skips_dispatch() {
        init_tracing();
        let config = EntityEventsConfig {
            enabled: false,
            ..Default::default()
        };
        let (hooks, log, _bus) = hooks_with(config);

        hooks.presave(&article(1, "news")).unwrap();
        hooks.insert(&article(1, "news")).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_ignored_entity_type_skipped() {
        let config = EntityEventsConfig {
            ignored_entity_types: vec!["user".to_string()],
            ..Default::default()
        };
        let (hooks, log, _bus) = hooks_with(config);

        hooks.update(&user_account(2)).unwrap();
        hooks.update(&article(2, "news")).unwrap();

        let seen = log.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].entity_type_id, "article");
    }

    #[test]
    fn test_listener_error_propagates_through_hooks() {
        let (hooks, _log, bus) = hooks_with(EntityEventsConfig::default());
        bus.subscribe(
            ENTITY_PRE_SAVE,
            listener_fn(|event| {
                if event.bundle() == Some("locked") {
                    anyhow::bail!("bundle is locked");
                }
                Ok(Propagation::Continue)
            }),
        );

        assert!(hooks.presave(&article(1, "news")).is_ok());
        let err = hooks.presave(&article(1, "locked")).unwrap_err();
        assert_eq!(err.to_string(), "bundle is locked");
    }

    #[test]
    fn test_dispatcher_as_save_lifecycle() {
        let bus = EventBus::new();
        let log = seen_log();
        bus.subscribe(ENTITY_POST_SAVE, recording_listener(log.clone(), "post"));
        let lifecycle: Arc<dyn SaveLifecycle> =
            Arc::new(EntityDispatcher::new(Arc::new(bus)));

        lifecycle.notify_post_save(&article(1, "news"), true).unwrap();
        lifecycle.notify_pre_save(&article(1, "news"), true).unwrap();

        assert_eq!(log.lock().unwrap().len(), 1);
    }
}
