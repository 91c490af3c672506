//! # MudProg Game Bindings
//!
//! Game objects exposed to progs, and the dot-reference tables describing
//! what a prog may read from each of them.
//!
//! ## Modules
//!
//! - `currency` - Currencies and their denominations
//! - `character` - Player and non-player characters
//! - `shop` - Shops and the merchandise they stock
//! - `liquid` - Drinkable and other liquids

pub mod character;
pub mod currency;
pub mod liquid;
pub mod shop;

pub use character::Character;
pub use currency::Currency;
pub use liquid::Liquid;
pub use shop::{Merchandise, Shop};

use mudprog_scripting::{DotReferenceRegistry, RegistryError};

/// Register the dot-reference table of every entity kind in this crate
pub fn register_entity_types(registry: &mut DotReferenceRegistry) -> Result<(), RegistryError> {
    let definitions = [
        currency::definition(),
        character::definition(),
        shop::definition(),
        shop::merchandise_definition(),
        liquid::definition(),
    ];
    for definition in definitions {
        registry.register_entity_type(definition)?;
    }
    tracing::debug!("Registered game entity types");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mudprog_config::ProgConfig;
    use mudprog_core::EntityId;
    use mudprog_scripting::{
        BinaryOperator, CompileError, Expr, ProgParameter, ProgRuntime, StatementResult, TypeKind, Value,
        VariableType,
    };
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn runtime() -> ProgRuntime {
        ProgRuntime::builder(ProgConfig::default())
            .with_standard_library()
            .with_entity_types(register_entity_types)
            .build()
            .unwrap()
    }

    fn crowns() -> Arc<Currency> {
        Arc::new(Currency::new(EntityId::new(1), "crowns", Decimal::ONE))
    }

    fn shop(owner: Option<Arc<Character>>) -> Arc<Shop> {
        let mut shop = Shop::new(EntityId::new(20), "The Rusty Anchor", crowns());
        shop.owner = owner;
        shop.merchandise.push(Arc::new(Merchandise::new(EntityId::new(30), "ale", Decimal::new(25, 1))));
        shop.merchandise.push(Arc::new(Merchandise::new(EntityId::new(31), "stew", Decimal::from(4))));
        Arc::new(shop)
    }

    #[test]
    fn test_every_entity_type_registers() {
        let runtime = runtime();
        let kinds: Vec<_> = runtime.dot_references().entity_types().collect();
        assert_eq!(
            kinds,
            vec![
                TypeKind::Character,
                TypeKind::Currency,
                TypeKind::Liquid,
                TypeKind::Shop,
                TypeKind::Merchandise
            ]
        );

        let mut again = DotReferenceRegistry::new();
        register_entity_types(&mut again).unwrap();
        assert!(matches!(
            register_entity_types(&mut again),
            Err(RegistryError::DuplicateEntityType(_))
        ));
    }

    #[test]
    fn test_currency_name_is_typed_and_resolved() {
        let runtime = runtime();
        let currency_type = VariableType::of(TypeKind::Currency);
        assert_eq!(
            runtime.dot_references().type_of_property(TypeKind::Currency, "name"),
            Some(VariableType::TEXT)
        );

        let prog = runtime
            .compiler()
            .compile_prog(
                "currency name",
                VariableType::TEXT,
                vec![ProgParameter::new("currency", currency_type)],
                &Expr::variable("currency").dot("name"),
            )
            .unwrap();
        assert_eq!(prog.root().return_type(), VariableType::TEXT);

        let evaluation = prog.execute([("currency", Value::Entity(crowns().into()))]);
        assert_eq!(evaluation.value, Value::text("crowns"));
        assert_eq!(evaluation.result, StatementResult::Normal);
    }

    #[test]
    fn test_property_chain() {
        let runtime = runtime();
        let owner = Arc::new(Character::new(EntityId::new(5), "Marla"));
        let body = Expr::call(
            "concat",
            vec![Expr::text("Owner: "), Expr::variable("shop").dot("owner").dot("name")],
        );
        let prog = runtime
            .compiler()
            .compile_prog(
                "owner",
                VariableType::TEXT,
                vec![ProgParameter::new("shop", VariableType::of(TypeKind::Shop))],
                &body,
            )
            .unwrap();

        let staffed = prog.execute([("shop", Value::Entity(shop(Some(owner)).into()))]);
        assert_eq!(staffed.value, Value::text("Owner: Marla"));

        // A shop with no owner degrades through the null reference
        let abandoned = prog.execute([("shop", Value::Entity(shop(None).into()))]);
        assert_eq!(abandoned.value, Value::text("Owner: "));
        assert!(abandoned.is_normal());
    }

    #[test]
    fn test_void_property_concatenates_as_empty() {
        let runtime = runtime();
        let character = VariableType::of(TypeKind::Character);
        let body = Expr::binary(
            Expr::text("foo"),
            BinaryOperator::Add,
            Expr::variable("who").dot("title"),
        );
        let prog = runtime
            .compiler()
            .compile_prog("title", VariableType::TEXT, vec![ProgParameter::new("who", character)], &body)
            .unwrap();

        let untitled = Arc::new(Character::new(EntityId::new(6), "Bram"));
        let evaluation = prog.execute([("who", Value::Entity(untitled.into()))]);
        assert_eq!(evaluation.value, Value::text("foo"));
        assert_eq!(evaluation.result, StatementResult::Normal);
    }

    #[test]
    fn test_collection_property_feeds_builtins() {
        let runtime = runtime();
        let merchandise = Expr::variable("shop").dot("merchandise");
        let parameters = vec![ProgParameter::new("shop", VariableType::of(TypeKind::Shop))];
        let compiler = runtime.compiler();

        let count = compiler
            .compile_prog("stock", VariableType::NUMBER, parameters.clone(), &Expr::call("count", vec![merchandise.clone()]))
            .unwrap();
        assert_eq!(count.execute([("shop", Value::Entity(shop(None).into()))]).value, Value::from(2));

        // Properties cannot be read from a collection directly
        let invalid = compiler.compile(&merchandise.dot("price"), &parameters);
        assert!(matches!(invalid, Err(CompileError::NotAnEntity { .. })));
    }

    #[test]
    fn test_unknown_property_is_compile_error() {
        let runtime = runtime();
        let result = runtime.compiler().compile(
            &Expr::variable("currency").dot("weight"),
            &[ProgParameter::new("currency", VariableType::of(TypeKind::Currency))],
        );
        assert!(matches!(result, Err(CompileError::UnknownProperty { .. })));
    }
}
