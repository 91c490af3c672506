//! Prog runtime values

use crate::dot_reference::DotReferenceRegistry;
use crate::entity::{EntityRef, ProgEntity};
use crate::error::{EvalError, Result};
use crate::types::{TypeKind, VariableType};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// One evaluated result
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value
    Void,

    Boolean(bool),

    /// Arbitrary-precision decimal
    Number(Decimal),

    Text(String),

    /// Ordered, homogeneous sequence
    Collection(ProgCollection),

    /// Reference to a game object, possibly null
    Entity(EntityRef),
}

impl Value {
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    pub fn number(number: impl Into<Decimal>) -> Self {
        Value::Number(number.into())
    }

    pub fn boolean(value: bool) -> Self {
        Value::Boolean(value)
    }

    pub fn entity(entity: Arc<dyn ProgEntity>) -> Self {
        Value::Entity(EntityRef::new(entity))
    }

    pub fn null_entity(kind: TypeKind) -> Self {
        Value::Entity(EntityRef::null(kind))
    }

    /// The type this value carries
    pub fn variable_type(&self) -> VariableType {
        match self {
            Value::Void => VariableType::VOID,
            Value::Boolean(_) => VariableType::BOOLEAN,
            Value::Number(_) => VariableType::NUMBER,
            Value::Text(_) => VariableType::TEXT,
            Value::Collection(collection) => VariableType::Collection(collection.element_kind()),
            Value::Entity(entity) => VariableType::Single(entity.kind()),
        }
    }

    /// Base value used when data of `ty` is absent
    pub fn default_for(ty: VariableType) -> Value {
        match ty {
            VariableType::Single(TypeKind::Boolean) => Value::Boolean(false),
            VariableType::Single(TypeKind::Number) => Value::Number(Decimal::ZERO),
            VariableType::Single(TypeKind::Text) => Value::Text(String::new()),
            VariableType::Single(kind) if kind.is_entity() => Value::null_entity(kind),
            VariableType::Collection(kind) if kind.is_concrete() => {
                Value::Collection(ProgCollection::empty(kind))
            }
            _ => Value::Void,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&ProgCollection> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Value::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Void, or an entity reference pointing at nothing
    pub fn is_null(&self) -> bool {
        match self {
            Value::Void => true,
            Value::Entity(entity) => entity.is_null(),
            _ => false,
        }
    }

    /// Runtime half of dot-reference resolution
    pub fn get_property(&self, name: &str, registry: &DotReferenceRegistry) -> Result<Value> {
        match self {
            Value::Entity(entity) => entity.get_property(name, registry),
            other => Err(EvalError::TypeMismatch {
                expected: VariableType::REFERENCE,
                found: other.variable_type(),
            }),
        }
    }

    /// Textual rendering used by `totext` and concatenation
    pub fn display_text(&self) -> String {
        match self {
            Value::Void => String::new(),
            Value::Boolean(value) => value.to_string(),
            Value::Number(number) => number.normalize().to_string(),
            Value::Text(text) => text.clone(),
            Value::Collection(collection) => collection
                .iter()
                .map(Value::display_text)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Entity(entity) => entity
                .target()
                .map(|target| target.name().to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Decimal::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Decimal::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<EntityRef> for Value {
    fn from(value: EntityRef) -> Self {
        Value::Entity(value)
    }
}

/// A homogeneous, ordered collection. The element kind is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgCollection {
    element: TypeKind,
    items: Vec<Value>,
}

impl ProgCollection {
    /// An empty collection of a concrete kind.
    ///
    /// Wildcard and Void/Error kinds fall back to an empty Text collection
    /// rather than producing an unrepresentable collection.
    pub fn empty(element: TypeKind) -> Self {
        let element = if element.is_concrete() { element } else { TypeKind::Text };
        Self {
            element,
            items: Vec::new(),
        }
    }

    /// Build a collection, checking that every element has exactly `element` kind
    pub fn from_values(element: TypeKind, values: Vec<Value>) -> Result<Self> {
        if !element.is_concrete() {
            return Err(EvalError::InvalidCollection(format!(
                "{} cannot be a collection element kind",
                element
            )));
        }
        let mut collection = Self {
            element,
            items: Vec::with_capacity(values.len()),
        };
        for value in values {
            collection.push(value)?;
        }
        Ok(collection)
    }

    /// Append a value of the collection's element kind
    pub fn push(&mut self, value: Value) -> Result<()> {
        let found = value.variable_type();
        if found != VariableType::Single(self.element) {
            return Err(EvalError::InvalidCollection(format!(
                "cannot add {} to a {} collection",
                found, self.element
            )));
        }
        self.items.push(value);
        Ok(())
    }

    pub fn element_kind(&self) -> TypeKind {
        self.element
    }

    pub fn element_type(&self) -> VariableType {
        VariableType::Single(self.element)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.items.iter()
    }
}
