//! # Characters
//!
//! Player and non-player characters as progs see them.

use mudprog_core::EntityId;
use mudprog_scripting::{EntityTypeBuilder, EntityTypeDefinition, ProgEntity, TypeKind, Value, VariableType};
use rust_decimal::Decimal;
use std::any::Any;

/// A character
#[derive(Debug, Clone)]
pub struct Character {
    pub id: EntityId,

    /// Name the character is known by
    pub name: String,

    /// Short description shown to others
    pub description: String,

    /// Optional honorific, e.g. "the Bold"
    pub title: Option<String>,

    /// Current health points
    pub health: Decimal,

    /// Whether a player controls this character
    pub is_player: bool,
}

impl Character {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            description: format!("{} stands here.", name),
            name,
            title: None,
            health: Decimal::from(100),
            is_player: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl ProgEntity for Character {
    fn kind(&self) -> TypeKind {
        TypeKind::Character
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
    EntityTypeBuilder::<Character>::new(TypeKind::Character)
        .help("A player or non-player character.")
        .property("name", VariableType::TEXT, "The character's name", |c| Value::text(c.name.clone()))
        .property("id", VariableType::NUMBER, "The unique identifier of the character", |c| {
            Value::Number(c.id.get().into())
        })
        .property("description", VariableType::TEXT, "Short description", |c| {
            Value::text(c.description.clone())
        })
        .property("title", VariableType::TEXT, "Honorific, empty when none", |c| {
            c.title.clone().map(Value::Text).unwrap_or(Value::Void)
        })
        .property("health", VariableType::NUMBER, "Current health points", |c| Value::Number(c.health))
        .property("isplayer", VariableType::BOOLEAN, "True for player characters", |c| {
            Value::Boolean(c.is_player)
        })
        .build()
}
