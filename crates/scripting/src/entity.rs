//! Entity references
//!
//! Game objects are opaque to the runtime. An entity owner implements
//! [`ProgEntity`] and registers a dot-reference table for its kind; the
//! runtime only ever reaches the object through that table.

use crate::dot_reference::DotReferenceRegistry;
use crate::error::Result;
use crate::types::TypeKind;
use crate::value::Value;
use mudprog_core::EntityId;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A live game object that can be handed to a prog
pub trait ProgEntity: Any + Send + Sync + fmt::Debug {
    /// The entity kind this object is registered under
    fn kind(&self) -> TypeKind;

    /// Stable identifier, used for equality
    fn id(&self) -> EntityId;

    /// Display name
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// A typed, possibly null, reference to a game object
#[derive(Clone)]
pub struct EntityRef {
    kind: TypeKind,
    target: Option<Arc<dyn ProgEntity>>,
}

impl EntityRef {
    pub fn new(entity: Arc<dyn ProgEntity>) -> Self {
        Self {
            kind: entity.kind(),
            target: Some(entity),
        }
    }

    /// A reference of `kind` that currently points at nothing
    pub fn null(kind: TypeKind) -> Self {
        Self { kind, target: None }
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn target(&self) -> Option<&Arc<dyn ProgEntity>> {
        self.target.as_ref()
    }

    pub fn id(&self) -> Option<EntityId> {
        self.target.as_ref().map(|entity| entity.id())
    }

    pub fn is_null(&self) -> bool {
        self.target.is_none()
    }

    /// Runtime dot-reference lookup, case-insensitive
    pub fn get_property(&self, name: &str, registry: &DotReferenceRegistry) -> Result<Value> {
        registry.resolve(self, name)
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.id() == other.id()
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(entity) => write!(f, "{}({} {})", self.kind, entity.id(), entity.name()),
            None => write!(f, "{}(null)", self.kind),
        }
    }
}

impl<T: ProgEntity> From<Arc<T>> for EntityRef {
    fn from(entity: Arc<T>) -> Self {
        EntityRef::new(entity)
    }
}
