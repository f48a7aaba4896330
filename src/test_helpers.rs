//! Test fixtures: sample entities and recording listeners
#![allow(dead_code)]

use crate::entity::{Bundleable, Entity};
use crate::events::{listener_fn, EntityEventListener, Propagation, SavePhase};
use std::sync::{Arc, Mutex};

// ============================================================================
// Entities
// ============================================================================

/// Content entity with a bundle, e.g. an "article" of bundle "news"
#[derive(Debug, Clone)]
pub struct Article {
    pub id: Option<u64>,
    pub bundle: String,
}

impl Entity for Article {
    fn entity_type_id(&self) -> &str {
        "article"
    }

    fn id(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn as_bundleable(&self) -> Option<&dyn Bundleable> {
        Some(self)
    }
}

impl Bundleable for Article {
    fn bundle(&self) -> &str {
        &self.bundle
    }
}

/// Entity type without a bundle concept
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Option<u64>,
}

impl Entity for UserAccount {
    fn entity_type_id(&self) -> &str {
        "user"
    }

    fn id(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// Saved article with the given id and bundle
pub fn article(id: u64, bundle: &str) -> Article {
    Article {
        id: Some(id),
        bundle: bundle.to_string(),
    }
}

/// Unsaved article (no id yet)
pub fn new_article(bundle: &str) -> Article {
    Article {
        id: None,
        bundle: bundle.to_string(),
    }
}

/// Saved user account
pub fn user_account(id: u64) -> UserAccount {
    UserAccount { id: Some(id) }
}

// ============================================================================
// Listeners
// ============================================================================

/// What a recording listener saw for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub tag: &'static str,
    pub phase: SavePhase,
    pub entity_type_id: String,
    pub bundle: Option<String>,
    pub is_new: bool,
}

pub type SeenLog = Arc<Mutex<Vec<Seen>>>;

pub fn seen_log() -> SeenLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Listener that appends what it saw to `log`, tagged with `tag`
pub fn recording_listener(log: SeenLog, tag: &'static str) -> impl EntityEventListener + 'static {
    listener_fn(move |event| {
        log.lock().unwrap().push(Seen {
            tag,
            phase: event.phase(),
            entity_type_id: event.entity_type_id().to_string(),
            bundle: event.bundle().map(str::to_string),
            is_new: event.is_new(),
        });
        Ok(Propagation::Continue)
    })
}

/// Tags of the recorded events, in invocation order
pub fn seen_tags(log: &SeenLog) -> Vec<&'static str> {
    log.lock().unwrap().iter().map(|s| s.tag).collect()
}

/// Install a fmt subscriber writing through the test harness (ignored if already set)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("entity_events=trace")
        .with_test_writer()
        .try_init();
}
