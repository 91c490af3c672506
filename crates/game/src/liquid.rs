//! # Liquids

use mudprog_core::EntityId;
use mudprog_scripting::{EntityTypeBuilder, EntityTypeDefinition, ProgEntity, TypeKind, Value, VariableType};
use rust_decimal::Decimal;
use std::any::Any;

/// A liquid
#[derive(Debug, Clone)]
pub struct Liquid {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub colour: String,

    /// Fraction of alcohol by volume, 0 to 1
    pub alcohol: Decimal,

    pub drinkable: bool,
}

impl Liquid {
    pub fn new(id: EntityId, name: impl Into<String>, colour: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            colour: colour.into(),
            alcohol: Decimal::ZERO,
            drinkable: true,
        }
    }
}

impl ProgEntity for Liquid {
    fn kind(&self) -> TypeKind {
        TypeKind::Liquid
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

pub fn definition() -> EntityTypeDefinition {
    EntityTypeBuilder::<Liquid>::new(TypeKind::Liquid)
        .help("A liquid, such as water, wine or lamp oil.")
        .property("name", VariableType::TEXT, "The name of the liquid", |l| Value::text(l.name.clone()))
        .property("id", VariableType::NUMBER, "The unique identifier of the liquid", |l| {
            Value::Number(l.id.get().into())
        })
        .property("description", VariableType::TEXT, "How the liquid looks up close", |l| {
            Value::text(l.description.clone())
        })
        .property("colour", VariableType::TEXT, "The colour of the liquid", |l| Value::text(l.colour.clone()))
        .property("alcohol", VariableType::NUMBER, "Fraction of alcohol by volume", |l| {
            Value::Number(l.alcohol)
        })
        .property("drinkable", VariableType::BOOLEAN, "True if the liquid can be drunk", |l| {
            Value::Boolean(l.drinkable)
        })
        .build()
}
