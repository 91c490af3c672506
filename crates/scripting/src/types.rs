//! Prog variable types
//!
//! A type is a base [`TypeKind`] either on its own or as the element kind of
//! an ordered collection. Collections of collections cannot be expressed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base kinds known to the prog language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeKind {
    // Primitives
    Void,
    Error,
    Boolean,
    Number,
    Text,

    // Entity kinds, one per exposed domain object
    Character,
    Item,
    Location,
    Currency,
    Liquid,
    LiquidMixture,
    Trait,
    Exit,
    Shop,
    Merchandise,
    Race,
    Culture,
    Merit,

    // Wildcards, only valid as parameter types
    /// Any entity kind
    Reference,
    /// Anything except an error
    Anything,
}

impl TypeKind {
    /// Every entity kind, in declaration order
    pub const ENTITY_KINDS: [TypeKind; 13] = [
        TypeKind::Character,
        TypeKind::Item,
        TypeKind::Location,
        TypeKind::Currency,
        TypeKind::Liquid,
        TypeKind::LiquidMixture,
        TypeKind::Trait,
        TypeKind::Exit,
        TypeKind::Shop,
        TypeKind::Merchandise,
        TypeKind::Race,
        TypeKind::Culture,
        TypeKind::Merit,
    ];

    /// Every kind, in declaration order
    pub const ALL: [TypeKind; 20] = [
        TypeKind::Void,
        TypeKind::Error,
        TypeKind::Boolean,
        TypeKind::Number,
        TypeKind::Text,
        TypeKind::Character,
        TypeKind::Item,
        TypeKind::Location,
        TypeKind::Currency,
        TypeKind::Liquid,
        TypeKind::LiquidMixture,
        TypeKind::Trait,
        TypeKind::Exit,
        TypeKind::Shop,
        TypeKind::Merchandise,
        TypeKind::Race,
        TypeKind::Culture,
        TypeKind::Merit,
        TypeKind::Reference,
        TypeKind::Anything,
    ];

    pub fn is_entity(self) -> bool {
        Self::ENTITY_KINDS.contains(&self)
    }

    pub fn is_wildcard(self) -> bool {
        matches!(self, TypeKind::Reference | TypeKind::Anything)
    }

    /// Entity kinds and the `Reference` wildcard
    pub fn is_reference_like(self) -> bool {
        self.is_entity() || self == TypeKind::Reference
    }

    /// Whether a collection may be declared over this kind
    pub fn is_collectable(self) -> bool {
        !matches!(self, TypeKind::Void | TypeKind::Error)
    }

    /// Whether a runtime collection may hold elements of exactly this kind
    pub fn is_concrete(self) -> bool {
        self.is_collectable() && !self.is_wildcard()
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeKind::Void => "Void",
            TypeKind::Error => "Error",
            TypeKind::Boolean => "Boolean",
            TypeKind::Number => "Number",
            TypeKind::Text => "Text",
            TypeKind::Character => "Character",
            TypeKind::Item => "Item",
            TypeKind::Location => "Location",
            TypeKind::Currency => "Currency",
            TypeKind::Liquid => "Liquid",
            TypeKind::LiquidMixture => "LiquidMixture",
            TypeKind::Trait => "Trait",
            TypeKind::Exit => "Exit",
            TypeKind::Shop => "Shop",
            TypeKind::Merchandise => "Merchandise",
            TypeKind::Race => "Race",
            TypeKind::Culture => "Culture",
            TypeKind::Merit => "Merit",
            TypeKind::Reference => "Reference",
            TypeKind::Anything => "Anything",
        }
    }

    /// Parse a kind name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Whether a value of kind `self` satisfies a parameter of kind `required`
    fn satisfies(self, required: TypeKind) -> bool {
        if self == TypeKind::Error || required == TypeKind::Error {
            return false;
        }
        if self == required {
            return true;
        }
        match required {
            TypeKind::Anything => true,
            TypeKind::Reference => self.is_reference_like() || self == TypeKind::Void,
            kind if kind.is_entity() => self == TypeKind::Void,
            _ => false,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A prog type: a single value of some kind, or an ordered collection of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VariableType {
    Single(TypeKind),
    Collection(TypeKind),
}

impl VariableType {
    pub const VOID: VariableType = VariableType::Single(TypeKind::Void);
    pub const ERROR: VariableType = VariableType::Single(TypeKind::Error);
    pub const BOOLEAN: VariableType = VariableType::Single(TypeKind::Boolean);
    pub const NUMBER: VariableType = VariableType::Single(TypeKind::Number);
    pub const TEXT: VariableType = VariableType::Single(TypeKind::Text);
    pub const REFERENCE: VariableType = VariableType::Single(TypeKind::Reference);
    pub const ANYTHING: VariableType = VariableType::Single(TypeKind::Anything);

    pub const fn of(kind: TypeKind) -> Self {
        VariableType::Single(kind)
    }

    /// `Collection` over `kind`, if such a collection can exist
    pub fn collection_of(kind: TypeKind) -> Option<Self> {
        VariableType::Single(kind).compose()
    }

    /// Apply the collection modifier. Fails for types that are already
    /// collections and for Void/Error.
    pub fn compose(self) -> Option<Self> {
        match self {
            VariableType::Single(kind) if kind.is_collectable() => {
                Some(VariableType::Collection(kind))
            }
            _ => None,
        }
    }

    pub fn kind(self) -> TypeKind {
        match self {
            VariableType::Single(kind) | VariableType::Collection(kind) => kind,
        }
    }

    pub fn is_collection(self) -> bool {
        matches!(self, VariableType::Collection(_))
    }

    /// Element type of a collection type
    pub fn element_type(self) -> Option<VariableType> {
        match self {
            VariableType::Collection(kind) => Some(VariableType::Single(kind)),
            VariableType::Single(_) => None,
        }
    }

    pub fn is_error(self) -> bool {
        self.kind() == TypeKind::Error
    }

    /// Whether a value of type `self` may be supplied where `required` is expected.
    ///
    /// Error never satisfies anything, not even itself. Void satisfies
    /// reference-like single types, so "no entity" is a valid reference.
    pub fn compatible_with(self, required: VariableType) -> bool {
        match (self, required) {
            (VariableType::Single(candidate), VariableType::Single(required)) => {
                candidate.satisfies(required)
            }
            (VariableType::Collection(candidate), VariableType::Collection(required)) => {
                candidate != TypeKind::Void && candidate.satisfies(required)
            }
            (VariableType::Collection(candidate), VariableType::Single(TypeKind::Anything)) => {
                candidate.is_collectable()
            }
            _ => false,
        }
    }

    /// Stable human-readable name, used in generated documentation
    pub fn describe(self) -> String {
        match self {
            VariableType::Single(kind) => kind.name().to_string(),
            VariableType::Collection(kind) => format!("{} Collection", kind.name()),
        }
    }

    /// Inverse of [`VariableType::describe`]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let lower = text.to_lowercase();
        match lower.strip_suffix(" collection") {
            Some(base) => TypeKind::from_name(base).and_then(VariableType::collection_of),
            None => TypeKind::from_name(text).map(VariableType::Single),
        }
    }
}

impl From<TypeKind> for VariableType {
    fn from(kind: TypeKind) -> Self {
        VariableType::Single(kind)
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Render a list of types as `Text, Number`
pub fn describe_signature(types: &[VariableType]) -> String {
    types
        .iter()
        .map(|ty| ty.describe())
        .collect::<Vec<_>>()
        .join(", ")
}
