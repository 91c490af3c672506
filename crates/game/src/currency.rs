//! # Currencies
//!
//! A currency is the unit shops price their stock in.

use mudprog_core::EntityId;
use mudprog_scripting::{EntityTypeBuilder, EntityTypeDefinition, ProgEntity, TypeKind, Value, VariableType};
use rust_decimal::Decimal;
use std::any::Any;

/// A currency
#[derive(Debug, Clone)]
pub struct Currency {
    pub id: EntityId,

    /// Plural display name, e.g. "crowns"
    pub name: String,

    /// Value of one unit relative to the base currency
    pub base_multiplier: Decimal,
}

impl Currency {
    pub fn new(id: EntityId, name: impl Into<String>, base_multiplier: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            base_multiplier,
        }
    }
}

impl ProgEntity for Currency {
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

pub fn definition() -> EntityTypeDefinition {
    EntityTypeBuilder::<Currency>::new(TypeKind::Currency)
        .help("A currency that goods can be priced in.")
        .property("name", VariableType::TEXT, "The name of the currency", |c| {
            Value::text(c.name.clone())
        })
        .property("id", VariableType::NUMBER, "The unique identifier of the currency", |c| {
            Value::Number(c.id.get().into())
        })
        .property(
            "multiplier",
            VariableType::NUMBER,
            "How many base units one unit of this currency is worth",
            |c| Value::Number(c.base_multiplier),
        )
        .build()
}
