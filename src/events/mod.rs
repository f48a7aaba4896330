//! Entity save events
//!
//! This module provides:
//! - `EntitySaveEvent`: pre-save / post-save payload borrowing the entity
//! - `EventBus`: synchronous listener registry keyed by event name
//! - `EntityDispatcher`: publishes save events on an injected `EventDispatcher`
//! - `BroadcastListener`: forwards owned event records to a broadcast channel

mod broadcast;
mod bus;
mod dispatcher;
mod types;

pub use broadcast::{BroadcastListener, DEFAULT_CAPACITY as DEFAULT_BROADCAST_CAPACITY};
pub use bus::{listener_fn, EntityEventListener, EventBus, EventDispatcher, FnListener, ListenerId};
pub use dispatcher::EntityDispatcher;
pub use types::{
    EntitySaveEvent, Propagation, SaveEventRecord, SavePhase, ENTITY_POST_SAVE, ENTITY_PRE_SAVE,
};
