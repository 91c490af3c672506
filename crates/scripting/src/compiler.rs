//! Prog compiler
//!
//! Type checks an untyped [`Expr`] against the declared parameters and the
//! registries, producing an evaluable node tree. Every name, overload,
//! property and operator is resolved here, so a tree that compiles never
//! meets an unknown symbol at runtime.

use crate::ast::Expr;
use crate::dot_reference::DotReferenceRegistry;
use crate::error::CompileError;
use crate::node::{BinaryNode, BuiltInNode, CollectionNode, ConstantNode, DotReferenceNode, NodeRef, VariableNode};
use crate::operators::{resolve_binary, resolve_unary};
use crate::prog::{Prog, ProgParameter};
use crate::registry::FunctionRegistry;
use crate::space::DEFAULT_MAX_DEPTH;
use crate::types::{describe_signature, VariableType};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

type Result<T> = std::result::Result<T, CompileError>;

/// Declared parameter types, keyed by lowercased name
type Scope = HashMap<String, VariableType>;

/// Compiles expressions against a fixed pair of registries
#[derive(Debug, Clone)]
pub struct Compiler {
    functions: Arc<FunctionRegistry>,
    dot_references: Arc<DotReferenceRegistry>,
    max_depth: usize,
}

impl Compiler {
    pub fn new(functions: Arc<FunctionRegistry>, dot_references: Arc<DotReferenceRegistry>) -> Self {
        Self {
            functions,
            dot_references,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Evaluation depth bound given to compiled progs
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Compile a complete prog and check its result type
    pub fn compile_prog(
        &self,
        name: impl Into<String>,
        return_type: VariableType,
        parameters: Vec<ProgParameter>,
        body: &Expr,
    ) -> Result<Prog> {
        let name = name.into();
        let root = self.compile(body, &parameters)?;
        let found = root.return_type();
        if !found.compatible_with(return_type) {
            return Err(CompileError::ReturnTypeMismatch {
                expected: return_type,
                found,
            });
        }
        tracing::debug!("Compiled prog {} returning {}", name, return_type);
        Ok(Prog::new(name, return_type, parameters, root, self.max_depth))
    }

    /// Compile a bare expression
    pub fn compile(&self, expr: &Expr, parameters: &[ProgParameter]) -> Result<NodeRef> {
        let scope = declare(parameters)?;
        self.compile_expr(expr, &scope)
    }

    fn compile_expr(&self, expr: &Expr, scope: &Scope) -> Result<NodeRef> {
        match expr {
            Expr::Number(n) => Ok(constant(Value::Number(*n))),
            Expr::Text(s) => Ok(constant(Value::Text(s.clone()))),
            Expr::Boolean(b) => Ok(constant(Value::Boolean(*b))),
            Expr::Null => Ok(constant(Value::Void)),

            Expr::Variable(name) => {
                let ty = scope
                    .get(&name.to_lowercase())
                    .copied()
                    .ok_or_else(|| CompileError::UnknownVariable(name.clone()))?;
                Ok(Box::new(VariableNode::new(name.clone(), ty)))
            }

            Expr::Binary { left, op, right } => {
                let left = self.compile_expr(left, scope)?;
                let right = self.compile_expr(right, scope)?;
                let operands = [left.return_type(), right.return_type()];
                let (ty, body) = resolve_binary(*op, operands[0], operands[1]).ok_or_else(|| {
                    CompileError::OperatorMismatch {
                        operator: op.symbol().to_string(),
                        operands: describe_signature(&operands),
                    }
                })?;
                Ok(Box::new(BinaryNode::new(op.symbol(), ty, left, right, body)))
            }

            Expr::Unary { op, operand } => {
                let operand = self.compile_expr(operand, scope)?;
                let operand_type = operand.return_type();
                let (ty, body) = resolve_unary(*op, operand_type).ok_or_else(|| CompileError::OperatorMismatch {
                    operator: op.symbol().to_string(),
                    operands: operand_type.describe(),
                })?;
                Ok(Box::new(BuiltInNode::new(op.symbol(), ty, vec![operand], body)))
            }

            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.compile_expr(arg, scope))
                    .collect::<Result<Vec<_>>>()?;
                let types: Vec<_> = args.iter().map(|arg| arg.return_type()).collect();
                let overload = self.functions.resolve(name, &types)?;
                Ok(overload.build_node(args))
            }

            Expr::DotReference { target, property } => {
                let target = self.compile_expr(target, scope)?;
                let target_type = target.return_type();
                let kind = match target_type {
                    VariableType::Single(kind) if kind.is_entity() => kind,
                    _ => {
                        return Err(CompileError::NotAnEntity {
                            target: target_type,
                            property: property.clone(),
                        })
                    }
                };
                let ty = self
                    .dot_references
                    .type_of_property(kind, property)
                    .ok_or_else(|| CompileError::UnknownProperty {
                        kind,
                        property: property.clone(),
                    })?;
                Ok(Box::new(DotReferenceNode::new(
                    target,
                    property.clone(),
                    ty,
                    Arc::clone(&self.dot_references),
                )))
            }

            Expr::Collection { element, items } => {
                let items = items
                    .iter()
                    .map(|item| self.compile_expr(item, scope))
                    .collect::<Result<Vec<_>>>()?;
                let element = match element {
                    Some(element) => *element,
                    None => items
                        .iter()
                        .map(|item| item.return_type())
                        .find(|ty| *ty != VariableType::VOID)
                        .ok_or(CompileError::UntypedCollection)?,
                };
                if element.is_collection() || !element.kind().is_concrete() {
                    return Err(CompileError::InvalidElementType(element));
                }
                for item in &items {
                    let ty = item.return_type();
                    let fits = ty == element || (ty == VariableType::VOID && element.kind().is_entity());
                    if !fits {
                        return Err(CompileError::MixedCollection {
                            first: element,
                            other: ty,
                        });
                    }
                }
                Ok(Box::new(CollectionNode::new(element, items)))
            }
        }
    }
}

fn constant(value: Value) -> NodeRef {
    Box::new(ConstantNode::new(value))
}

fn declare(parameters: &[ProgParameter]) -> Result<Scope> {
    let mut scope = Scope::with_capacity(parameters.len());
    for parameter in parameters {
        let key = parameter.name.to_lowercase();
        if scope.insert(key, parameter.variable_type).is_some() {
            return Err(CompileError::DuplicateParameter(parameter.name.clone()));
        }
    }
    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::error::EvalError;
    use crate::node::StatementResult;
    use crate::operators::{BinaryOperator, UnaryOperator};
    use crate::types::TypeKind;

    fn compiler() -> Compiler {
        let mut functions = FunctionRegistry::new();
        builtins::install(&mut functions).unwrap();
        Compiler::new(Arc::new(functions), Arc::new(DotReferenceRegistry::new()))
    }

    fn text_param(name: &str) -> ProgParameter {
        ProgParameter::new(name, VariableType::TEXT)
    }

    #[test]
    fn test_concat_prog() {
        let body = Expr::call("concat", vec![Expr::text("foo"), Expr::variable("suffix")]);
        let prog = compiler()
            .compile_prog("greeting", VariableType::TEXT, vec![text_param("suffix")], &body)
            .unwrap();

        let evaluation = prog.execute([("suffix", Value::text("bar"))]);
        assert_eq!(evaluation.value, Value::text("foobar"));
        assert_eq!(evaluation.result, StatementResult::Normal);
    }

    #[test]
    fn test_unknown_variable_is_compile_error() {
        let body = Expr::call("concat", vec![Expr::text("foo"), Expr::variable("never_seeded")]);
        let result = compiler().compile_prog("broken", VariableType::TEXT, vec![text_param("suffix")], &body);
        assert_eq!(result.unwrap_err(), CompileError::UnknownVariable("never_seeded".into()));
    }

    #[test]
    fn test_parameters_are_case_insensitive() {
        let prog = compiler()
            .compile_prog("upper", VariableType::TEXT, vec![text_param("Target")], &Expr::variable("TARGET"))
            .unwrap();
        assert_eq!(prog.execute([("target", Value::text("x"))]).value, Value::text("x"));

        let duplicate = compiler().compile(&Expr::Null, &[text_param("a"), text_param("A")]);
        assert!(matches!(duplicate, Err(CompileError::DuplicateParameter(_))));
    }

    #[test]
    fn test_overload_errors_surface_at_compile_time() {
        let compiler = compiler();
        let missing = compiler.compile(&Expr::call("frobnicate", vec![]), &[]);
        assert!(matches!(missing, Err(CompileError::UnknownFunction(_))));

        let wrong = compiler.compile(&Expr::call("upper", vec![Expr::number(3)]), &[]);
        assert!(matches!(wrong, Err(CompileError::NoMatchingOverload { .. })));
    }

    #[test]
    fn test_operator_typing() {
        let compiler = compiler();
        let sum = compiler
            .compile(&Expr::binary(Expr::number(2), BinaryOperator::Multiply, Expr::number(21)), &[])
            .unwrap();
        assert_eq!(sum.return_type(), VariableType::NUMBER);

        let mixed = compiler.compile(&Expr::binary(Expr::number(2), BinaryOperator::And, Expr::text("x")), &[]);
        assert!(matches!(mixed, Err(CompileError::OperatorMismatch { .. })));

        let negated = compiler.compile(&Expr::unary(UnaryOperator::Not, Expr::boolean(false)), &[]).unwrap();
        assert_eq!(negated.return_type(), VariableType::BOOLEAN);
    }

    #[test]
    fn test_collection_literals() {
        let compiler = compiler();
        let numbers = compiler
            .compile(&Expr::collection(vec![Expr::number(1), Expr::number(2)]), &[])
            .unwrap();
        assert_eq!(numbers.return_type(), VariableType::Collection(TypeKind::Number));

        let mixed = compiler.compile(&Expr::collection(vec![Expr::number(1), Expr::text("2")]), &[]);
        assert!(matches!(mixed, Err(CompileError::MixedCollection { .. })));

        let untyped = compiler.compile(&Expr::collection(vec![]), &[]);
        assert_eq!(untyped.unwrap_err(), CompileError::UntypedCollection);

        let wildcard = compiler.compile(&Expr::typed_collection(VariableType::ANYTHING, vec![]), &[]);
        assert!(matches!(wildcard, Err(CompileError::InvalidElementType(_))));

        let empty = compiler
            .compile(&Expr::typed_collection(VariableType::TEXT, vec![]), &[])
            .unwrap();
        assert_eq!(empty.return_type(), VariableType::Collection(TypeKind::Text));
    }

    #[test]
    fn test_dot_reference_on_non_entity() {
        let result = compiler().compile(&Expr::text("gold").dot("name"), &[]);
        assert!(matches!(result, Err(CompileError::NotAnEntity { .. })));
    }

    #[test]
    fn test_return_type_checked() {
        let result = compiler().compile_prog("count", VariableType::NUMBER, vec![], &Expr::text("one"));
        assert!(matches!(result, Err(CompileError::ReturnTypeMismatch { .. })));
    }

    #[test]
    fn test_out_of_range_substring_is_normal() {
        let body = Expr::call("substring", vec![Expr::variable("text"), Expr::number(40)]);
        let prog = compiler()
            .compile_prog("tail", VariableType::TEXT, vec![text_param("text")], &body)
            .unwrap();
        let evaluation = prog.execute([("text", Value::text("short"))]);
        assert!(evaluation.is_normal());
        assert_eq!(evaluation.value, Value::text(""));
    }

    #[test]
    fn test_missing_seed_is_defaulted() {
        let body = Expr::call("length", vec![Expr::variable("text")]);
        let prog = compiler()
            .compile_prog("len", VariableType::NUMBER, vec![text_param("text")], &body)
            .unwrap();
        let evaluation = prog.execute(std::iter::empty::<(&str, Value)>());
        assert_eq!(evaluation.value, Value::from(0));
        assert!(evaluation.is_normal());
    }

    #[test]
    fn test_badly_typed_seed_is_error() {
        let prog = compiler()
            .compile_prog("echo", VariableType::TEXT, vec![text_param("text")], &Expr::variable("text"))
            .unwrap();
        let evaluation = prog.execute([("text", Value::from(5))]);
        assert_eq!(evaluation.result, StatementResult::Error);
        assert!(matches!(evaluation.error, Some(EvalError::TypeMismatch { .. })));
        assert_eq!(prog.execute_or([("text", Value::from(5))], Value::text("fallback")), Value::text("fallback"));
    }

    #[test]
    fn test_void_entity_seed_becomes_null_reference() {
        let character = VariableType::Single(TypeKind::Character);
        let prog = compiler()
            .compile_prog("who", character, vec![ProgParameter::new("who", character)], &Expr::variable("who"))
            .unwrap();

        let evaluation = prog.execute([("who", Value::Void)]);
        assert!(evaluation.is_normal());
        assert_eq!(evaluation.value.variable_type(), character);
        assert_eq!(evaluation.value, Value::null_entity(TypeKind::Character));
    }

    #[test]
    fn test_depth_limit_is_error_not_overflow() {
        let mut body = Expr::number(1);
        for _ in 0..40 {
            body = Expr::call("abs", vec![body]);
        }
        let prog = compiler()
            .with_max_depth(16)
            .compile_prog("deep", VariableType::NUMBER, vec![], &body)
            .unwrap();
        let evaluation = prog.execute(std::iter::empty::<(&str, Value)>());
        assert_eq!(evaluation.error, Some(EvalError::DepthExceeded(16)));
    }

    #[test]
    fn test_evaluation_is_deterministic_across_threads() {
        let body = Expr::binary(
            Expr::call("upper", vec![Expr::variable("name")]),
            BinaryOperator::Add,
            Expr::call("totext", vec![Expr::binary(Expr::number(6), BinaryOperator::Multiply, Expr::number(7))]),
        );
        let prog = Arc::new(
            compiler()
                .compile_prog("label", VariableType::TEXT, vec![text_param("name")], &body)
                .unwrap(),
        );

        let expected = prog.execute([("name", Value::text("crate"))]);
        assert_eq!(expected.value, Value::text("CRATE42"));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let prog = Arc::clone(&prog);
                std::thread::spawn(move || prog.execute([("name", Value::text("crate"))]))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
