//! Process-wide prog runtime
//!
//! Registries are filled once at start-up by registrars and frozen behind
//! `Arc`s. After that every compile and every evaluation only reads them.

use crate::builtins::{self, FunctionRegistrar};
use crate::compiler::Compiler;
use crate::dot_reference::DotReferenceRegistry;
use crate::error::RegistryError;
use crate::registry::FunctionRegistry;
use mudprog_config::ProgConfig;
use mudprog_core::MudError;
use std::sync::{Arc, OnceLock};

/// Adds the dot-reference tables of one or more entity kinds
pub type EntityTypeRegistrar = fn(&mut DotReferenceRegistry) -> Result<(), RegistryError>;

static RUNTIME: OnceLock<ProgRuntime> = OnceLock::new();

/// Collects registrars before the registries are frozen
pub struct ProgRuntimeBuilder {
    config: ProgConfig,
    functions: Vec<FunctionRegistrar>,
    entity_types: Vec<EntityTypeRegistrar>,
}

impl ProgRuntimeBuilder {
    pub fn new(config: ProgConfig) -> Self {
        Self {
            config,
            functions: Vec::new(),
            entity_types: Vec::new(),
        }
    }

    /// Include every standard library group
    pub fn with_standard_library(mut self) -> Self {
        self.functions.extend_from_slice(builtins::STANDARD_LIBRARY);
        self
    }

    pub fn with_functions(mut self, registrar: FunctionRegistrar) -> Self {
        self.functions.push(registrar);
        self
    }

    pub fn with_entity_types(mut self, registrar: EntityTypeRegistrar) -> Self {
        self.entity_types.push(registrar);
        self
    }

    /// Run every registrar. The first registration error aborts the build.
    pub fn build(self) -> Result<ProgRuntime, RegistryError> {
        let mut functions = FunctionRegistry::new();
        for registrar in &self.functions {
            registrar(&mut functions)?;
        }

        let mut dot_references = DotReferenceRegistry::new();
        for registrar in &self.entity_types {
            registrar(&mut dot_references)?;
        }

        tracing::info!(
            "Prog runtime ready: {} function overloads, {} entity types",
            functions.len(),
            dot_references.len()
        );

        Ok(ProgRuntime {
            functions: Arc::new(functions),
            dot_references: Arc::new(dot_references),
            config: self.config,
        })
    }
}

/// Frozen registries plus the options they were built with
#[derive(Debug)]
pub struct ProgRuntime {
    functions: Arc<FunctionRegistry>,
    dot_references: Arc<DotReferenceRegistry>,
    config: ProgConfig,
}

impl ProgRuntime {
    pub fn builder(config: ProgConfig) -> ProgRuntimeBuilder {
        ProgRuntimeBuilder::new(config)
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn dot_references(&self) -> &DotReferenceRegistry {
        &self.dot_references
    }

    pub fn config(&self) -> &ProgConfig {
        &self.config
    }

    /// A compiler over this runtime's registries
    pub fn compiler(&self) -> Compiler {
        Compiler::new(Arc::clone(&self.functions), Arc::clone(&self.dot_references))
            .with_max_depth(self.config.max_evaluation_depth)
    }
}

/// Build and install the process-wide runtime. Fails if one is already installed.
pub fn initialise(builder: ProgRuntimeBuilder) -> Result<&'static ProgRuntime, MudError> {
    if RUNTIME.get().is_some() {
        return Err(MudError::Registry("prog runtime is already initialised".into()));
    }
    let runtime = builder.build()?;
    RUNTIME
        .set(runtime)
        .map_err(|_| MudError::Registry("prog runtime is already initialised".into()))?;
    RUNTIME
        .get()
        .ok_or_else(|| MudError::Registry("prog runtime failed to initialise".into()))
}

/// The installed runtime, if [`initialise`] has run
pub fn global() -> Option<&'static ProgRuntime> {
    RUNTIME.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::types::VariableType;
    use crate::value::Value;

    fn failing_registrar(_: &mut DotReferenceRegistry) -> Result<(), RegistryError> {
        Err(RegistryError::InvalidRegistration {
            name: "broken".into(),
            message: "always fails".into(),
        })
    }

    #[test]
    fn test_builder_runs_registrars() {
        let runtime = ProgRuntime::builder(ProgConfig::default())
            .with_standard_library()
            .build()
            .unwrap();
        assert!(runtime.functions().contains("concat"));
        assert!(runtime.dot_references().is_empty());

        let prog = runtime
            .compiler()
            .compile_prog("hello", VariableType::TEXT, vec![], &Expr::call("upper", vec![Expr::text("hi")]))
            .unwrap();
        assert_eq!(prog.execute(std::iter::empty::<(&str, Value)>()).value, Value::text("HI"));
    }

    #[test]
    fn test_registration_failure_aborts_build() {
        let result = ProgRuntime::builder(ProgConfig::default())
            .with_entity_types(failing_registrar)
            .build();
        assert!(result.is_err());

        let twice = ProgRuntime::builder(ProgConfig::default())
            .with_standard_library()
            .with_functions(builtins::text::register)
            .build();
        assert!(matches!(twice, Err(RegistryError::DuplicateSignature { .. })));
    }

    #[test]
    fn test_initialise_once() {
        let runtime = initialise(ProgRuntime::builder(ProgConfig::default()).with_standard_library()).unwrap();
        assert!(std::ptr::eq(runtime, global().unwrap()));
        assert!(initialise(ProgRuntime::builder(ProgConfig::default())).is_err());
    }
}
