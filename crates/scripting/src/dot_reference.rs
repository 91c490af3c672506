//! Dot-reference registry
//!
//! Every entity kind registers a table of the properties a prog may reach
//! through `entity.property`, each with a declared type, help text and an
//! accessor. The compiler types property chains from the table without
//! evaluating anything; at runtime the same table dispatches the lookup.

use crate::entity::{EntityRef, ProgEntity};
use crate::error::{EvalError, RegistryError, Result};
use crate::types::{TypeKind, VariableType};
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased property accessor. Returns `None` when handed an object of
/// the wrong concrete type.
pub type PropertyAccessor = Arc<dyn Fn(&dyn ProgEntity) -> Option<Value> + Send + Sync>;

/// One registered property
#[derive(Clone)]
pub struct DotReferenceEntry {
    name: String,
    return_type: VariableType,
    help: String,
    accessor: PropertyAccessor,
}

impl DotReferenceEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> VariableType {
        self.return_type
    }

    pub fn help(&self) -> &str {
        &self.help
    }
}

impl fmt::Debug for DotReferenceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DotReferenceEntry")
            .field("name", &self.name)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

/// The property table of one entity kind
#[derive(Debug, Clone)]
pub struct EntityTypeDefinition {
    kind: TypeKind,
    help: String,
    entries: Vec<DotReferenceEntry>,
}

impl EntityTypeDefinition {
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn help(&self) -> &str {
        &self.help
    }
}

/// Builds the property table for entities of concrete type `T`
pub struct EntityTypeBuilder<T: ProgEntity> {
    kind: TypeKind,
    help: String,
    entries: Vec<DotReferenceEntry>,
    _entity: PhantomData<fn(&T)>,
}

impl<T: ProgEntity> EntityTypeBuilder<T> {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            help: String::new(),
            entries: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// Description of the entity kind itself
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Declare a property and its accessor
    pub fn property<F>(
        mut self,
        name: impl Into<String>,
        return_type: VariableType,
        help: impl Into<String>,
        accessor: F,
    ) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let accessor: PropertyAccessor = Arc::new(move |entity: &dyn ProgEntity| {
            entity.as_any().downcast_ref::<T>().map(|entity| accessor(entity))
        });
        self.entries.push(DotReferenceEntry {
            name: name.into(),
            return_type,
            help: help.into(),
            accessor,
        });
        self
    }

    pub fn build(self) -> EntityTypeDefinition {
        EntityTypeDefinition {
            kind: self.kind,
            help: self.help,
            entries: self.entries,
        }
    }
}

/// Registered property tables, keyed by entity kind
#[derive(Debug, Default)]
struct EntityTable {
    help: String,
    /// Keyed by lowercased property name
    properties: BTreeMap<String, DotReferenceEntry>,
}

/// Per-entity-kind dot-reference registry. Populated at start-up, read-only after.
#[derive(Debug, Default)]
pub struct DotReferenceRegistry {
    types: BTreeMap<TypeKind, EntityTable>,
}

impl DotReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the property table of one entity kind
    pub fn register_entity_type(&mut self, definition: EntityTypeDefinition) -> std::result::Result<(), RegistryError> {
        let kind = definition.kind;
        if !kind.is_entity() {
            return Err(RegistryError::NotAnEntityKind(kind));
        }
        if self.types.contains_key(&kind) {
            return Err(RegistryError::DuplicateEntityType(kind));
        }

        let mut table = EntityTable {
            help: definition.help,
            properties: BTreeMap::new(),
        };
        for entry in definition.entries {
            let ty = entry.return_type;
            if ty.is_error() || ty.kind().is_wildcard() {
                return Err(RegistryError::InvalidRegistration {
                    name: format!("{}.{}", kind, entry.name),
                    message: format!("{} is not a valid property type", ty),
                });
            }
            let key = entry.name.to_lowercase();
            if table.properties.contains_key(&key) {
                return Err(RegistryError::DuplicateProperty {
                    kind,
                    property: entry.name,
                });
            }
            table.properties.insert(key, entry);
        }

        tracing::debug!("Registered {} dot references for {}", table.properties.len(), kind);
        self.types.insert(kind, table);
        Ok(())
    }

    /// Static type of `kind.name`, or `None` if the property does not exist
    pub fn type_of_property(&self, kind: TypeKind, name: &str) -> Option<VariableType> {
        self.entry(kind, name).map(DotReferenceEntry::return_type)
    }

    pub fn entry(&self, kind: TypeKind, name: &str) -> Option<&DotReferenceEntry> {
        self.types.get(&kind)?.properties.get(&name.to_lowercase())
    }

    /// Resolve a property on a live reference
    pub fn resolve(&self, entity: &EntityRef, name: &str) -> Result<Value> {
        let kind = entity.kind();
        let Some(entry) = self.entry(kind, name) else {
            tracing::error!("Dot reference {}.{} is not registered", kind, name);
            return Err(EvalError::UnknownProperty {
                kind,
                property: name.to_string(),
            });
        };

        // A missing entity is an ordinary condition in a live world
        let Some(target) = entity.target() else {
            tracing::debug!(target: "mudprog::degraded", "{}.{} read through a null reference", kind, name);
            return Ok(Value::default_for(entry.return_type));
        };

        match (entry.accessor)(target.as_ref()) {
            None => {
                tracing::error!("Entity {} is not a {} binding for {}", target.id(), kind, name);
                Err(EvalError::EntityBinding {
                    kind,
                    property: entry.name.clone(),
                })
            }
            Some(Value::Void) => Ok(Value::default_for(entry.return_type)),
            Some(value) if value.variable_type().compatible_with(entry.return_type) => Ok(value),
            Some(value) => {
                tracing::error!(
                    "{}.{} produced {} but is declared {}",
                    kind,
                    entry.name,
                    value.variable_type(),
                    entry.return_type
                );
                Err(EvalError::TypeMismatch {
                    expected: entry.return_type,
                    found: value.variable_type(),
                })
            }
        }
    }

    /// Registered entity kinds, in declaration order
    pub fn entity_types(&self) -> impl Iterator<Item = TypeKind> + '_ {
        self.types.keys().copied()
    }

    /// Help text of an entity kind
    pub fn type_help(&self, kind: TypeKind) -> Option<&str> {
        self.types.get(&kind).map(|table| table.help.as_str())
    }

    /// Properties of `kind`, sorted by name
    pub fn properties(&self, kind: TypeKind) -> impl Iterator<Item = &DotReferenceEntry> + '_ {
        self.types
            .get(&kind)
            .into_iter()
            .flat_map(|table| table.properties.values())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mudprog_core::EntityId;
    use std::any::Any;

    #[derive(Debug)]
    struct Coin {
        id: EntityId,
        name: String,
        nickname: Option<String>,
    }

    impl ProgEntity for Coin {
        fn kind(&self) -> TypeKind {
            TypeKind::Currency
        }

        fn id(&self) -> EntityId {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Impostor;

    impl ProgEntity for Impostor {
        fn kind(&self) -> TypeKind {
            TypeKind::Currency
        }

        fn id(&self) -> EntityId {
            EntityId::new(99)
        }

        fn name(&self) -> &str {
            "impostor"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn registry() -> DotReferenceRegistry {
        let mut registry = DotReferenceRegistry::new();
        registry
            .register_entity_type(
                EntityTypeBuilder::<Coin>::new(TypeKind::Currency)
                    .help("A currency")
                    .property("name", VariableType::TEXT, "The name", |c| Value::text(c.name.clone()))
                    .property("nickname", VariableType::TEXT, "Slang name", |c| {
                        c.nickname.clone().map(Value::Text).unwrap_or(Value::Void)
                    })
                    .build(),
            )
            .unwrap();
        registry
    }

    fn coin() -> EntityRef {
        EntityRef::new(Arc::new(Coin {
            id: EntityId::new(1),
            name: "crown".into(),
            nickname: None,
        }))
    }

    #[test]
    fn test_type_of_property() {
        let registry = registry();
        assert_eq!(registry.type_of_property(TypeKind::Currency, "NAME"), Some(VariableType::TEXT));
        assert_eq!(registry.type_of_property(TypeKind::Currency, "weight"), None);
        assert_eq!(registry.type_of_property(TypeKind::Shop, "name"), None);
    }

    #[test]
    fn test_resolve() {
        let registry = registry();
        assert_eq!(registry.resolve(&coin(), "Name").unwrap(), Value::text("crown"));
        // Void from the accessor degrades to the declared type's default
        assert_eq!(registry.resolve(&coin(), "nickname").unwrap(), Value::text(""));
        // Null references degrade too
        let null = EntityRef::null(TypeKind::Currency);
        assert_eq!(registry.resolve(&null, "name").unwrap(), Value::text(""));
    }

    #[test]
    fn test_unknown_property_is_error_not_panic() {
        let registry = registry();
        let result = registry.resolve(&coin(), "weight");
        assert!(matches!(result, Err(EvalError::UnknownProperty { .. })));
    }

    #[test]
    fn test_mismatched_binding_is_error() {
        let registry = registry();
        let result = registry.resolve(&EntityRef::new(Arc::new(Impostor)), "name");
        assert!(matches!(result, Err(EvalError::EntityBinding { .. })));
    }

    #[test]
    fn test_registration_errors() {
        let mut registry = registry();
        let again = EntityTypeBuilder::<Coin>::new(TypeKind::Currency).build();
        assert_eq!(
            registry.register_entity_type(again),
            Err(RegistryError::DuplicateEntityType(TypeKind::Currency))
        );

        let not_entity = EntityTypeBuilder::<Coin>::new(TypeKind::Text).build();
        assert_eq!(
            registry.register_entity_type(not_entity),
            Err(RegistryError::NotAnEntityKind(TypeKind::Text))
        );

        let duplicate = EntityTypeBuilder::<Coin>::new(TypeKind::Item)
            .property("name", VariableType::TEXT, "", |c| Value::text(c.name.clone()))
            .property("Name", VariableType::TEXT, "", |c| Value::text(c.name.clone()))
            .build();
        assert!(matches!(
            registry.register_entity_type(duplicate),
            Err(RegistryError::DuplicateProperty { .. })
        ));
    }

    #[test]
    fn test_properties_are_listed_sorted() {
        let registry = registry();
        let names: Vec<_> = registry.properties(TypeKind::Currency).map(|p| p.name()).collect();
        assert_eq!(names, vec!["name", "nickname"]);
        assert_eq!(registry.type_help(TypeKind::Currency), Some("A currency"));
    }
}
