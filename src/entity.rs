//! Entity model consumed by the save events
//!
//! The host's domain records implement [`Entity`]. Sub-typing is an optional
//! capability: entity types that have bundles also implement [`Bundleable`]
//! and expose it through [`Entity::as_bundleable`].

/// A domain record managed by the host (content item, user account, ...)
pub trait Entity {
    /// Identifier of the entity's schema/type (e.g. `"node"`, `"user"`)
    fn entity_type_id(&self) -> &str;

    /// Identifier of this record, if one has been assigned
    fn id(&self) -> Option<String> {
        None
    }

    /// Whether the next save of this record is an insert
    fn is_new(&self) -> bool {
        false
    }

    /// Capability query for the bundle (sub-type) concept.
    ///
    /// Entity types without bundles keep the default, which yields `None`.
    fn as_bundleable(&self) -> Option<&dyn Bundleable> {
        None
    }
}

/// Optional capability: the entity type is split into bundles
pub trait Bundleable {
    /// Bundle (sub-type) of this record within its entity type
    fn bundle(&self) -> &str;
}
