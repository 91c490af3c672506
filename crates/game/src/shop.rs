//! # Shops
//!
//! A shop stocks merchandise priced in a single currency and may be run by
//! a character.

use crate::character::Character;
use crate::currency::Currency;
use mudprog_core::EntityId;
use mudprog_scripting::{
    EntityRef, EntityTypeBuilder, EntityTypeDefinition, ProgCollection, ProgEntity, TypeKind, Value, VariableType,
};
use rust_decimal::Decimal;
use std::any::Any;
use std::sync::Arc;

/// A shop
#[derive(Debug, Clone)]
pub struct Shop {
    pub id: EntityId,
    pub name: String,

    /// Keeper, if anyone is minding the shop
    pub owner: Option<Arc<Character>>,

    /// Currency every price is given in
    pub currency: Arc<Currency>,

    pub merchandise: Vec<Arc<Merchandise>>,
}

impl Shop {
    pub fn new(id: EntityId, name: impl Into<String>, currency: Arc<Currency>) -> Self {
        Self {
            id,
            name: name.into(),
            owner: None,
            currency,
            merchandise: Vec::new(),
        }
    }

    /// Stock as a prog collection
    fn merchandise_value(&self) -> Value {
        let items = self
            .merchandise
            .iter()
            .map(|item| Value::Entity(EntityRef::from(Arc::clone(item))))
            .collect();
        match ProgCollection::from_values(TypeKind::Merchandise, items) {
            Ok(collection) => Value::Collection(collection),
            Err(e) => {
                tracing::error!("Shop {} has unrepresentable stock: {}", self.id, e);
                Value::Void
            }
        }
    }
}

impl ProgEntity for Shop {
    fn kind(&self) -> TypeKind {
        TypeKind::Shop
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

/// One line of a shop's stock
#[derive(Debug, Clone)]
pub struct Merchandise {
    pub id: EntityId,
    pub name: String,

    /// Price in the shop's currency
    pub price: Decimal,

    /// Whether the shop will buy this back from customers
    pub will_buy: bool,
}

impl Merchandise {
    pub fn new(id: EntityId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            will_buy: false,
        }
    }
}

impl ProgEntity for Merchandise {
    fn kind(&self) -> TypeKind {
        TypeKind::Merchandise
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
    EntityTypeBuilder::<Shop>::new(TypeKind::Shop)
        .help("A place where merchandise is bought and sold.")
        .property("name", VariableType::TEXT, "The name of the shop", |s| Value::text(s.name.clone()))
        .property("id", VariableType::NUMBER, "The unique identifier of the shop", |s| {
            Value::Number(s.id.get().into())
        })
        .property(
            "owner",
            VariableType::of(TypeKind::Character),
            "The shopkeeper, or null when unattended",
            |s| {
                s.owner
                    .as_ref()
                    .map(|owner| Value::Entity(EntityRef::from(Arc::clone(owner))))
                    .unwrap_or(Value::Void)
            },
        )
        .property(
            "currency",
            VariableType::of(TypeKind::Currency),
            "The currency prices are given in",
            |s| Value::Entity(EntityRef::from(Arc::clone(&s.currency))),
        )
        .property(
            "merchandise",
            VariableType::Collection(TypeKind::Merchandise),
            "Everything the shop stocks",
            Shop::merchandise_value,
        )
        .build()
}

pub fn merchandise_definition() -> EntityTypeDefinition {
    EntityTypeBuilder::<Merchandise>::new(TypeKind::Merchandise)
        .help("An item a shop stocks, with its price.")
        .property("name", VariableType::TEXT, "The name of the merchandise", |m| {
            Value::text(m.name.clone())
        })
        .property("id", VariableType::NUMBER, "The unique identifier of the merchandise", |m| {
            Value::Number(m.id.get().into())
        })
        .property("price", VariableType::NUMBER, "Price in the shop's currency", |m| Value::Number(m.price))
        .property("willbuy", VariableType::BOOLEAN, "True if the shop buys this item", |m| {
            Value::Boolean(m.will_buy)
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchandise_collection_is_typed() {
        let mut shop = Shop::new(
            EntityId::new(1),
            "stall",
            Arc::new(Currency::new(EntityId::new(2), "pennies", Decimal::ONE)),
        );
        shop.merchandise.push(Arc::new(Merchandise::new(EntityId::new(3), "bread", Decimal::ONE)));

        let stock = shop.merchandise_value();
        assert_eq!(stock.variable_type(), VariableType::Collection(TypeKind::Merchandise));
        assert_eq!(stock.as_collection().map(ProgCollection::len), Some(1));
    }
}
