//! Expression nodes
//!
//! A compiled prog is a tree of nodes. Each node owns its children,
//! declares the type it returns and evaluates depth-first against a
//! [`VariableSpace`]. Nodes hold no evaluation state, so one tree can be
//! evaluated by many callers at once as long as each brings its own space.

use crate::dot_reference::DotReferenceRegistry;
use crate::error::{EvalError, Result};
use crate::space::VariableSpace;
use crate::types::VariableType;
use crate::value::{ProgCollection, Value};
use std::fmt;
use std::sync::Arc;

/// Outcome channel of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementResult {
    Normal,
    Error,
}

impl<T> From<&Result<T>> for StatementResult {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => StatementResult::Normal,
            Err(_) => StatementResult::Error,
        }
    }
}

/// One evaluable unit of a compiled prog
pub trait ExpressionNode: fmt::Debug + Send + Sync {
    /// Statically declared result type
    fn return_type(&self) -> VariableType;

    /// Evaluate this node and its children
    fn evaluate(&self, space: &mut VariableSpace) -> Result<Value>;

    /// Operands, in evaluation order
    fn children(&self) -> &[NodeRef] {
        &[]
    }
}

/// Owned child node
pub type NodeRef = Box<dyn ExpressionNode>;

/// Body of a built-in, run on already-evaluated arguments
pub type BuiltInFn = fn(&[Value]) -> Result<Value>;

/// Body of a binary operator
pub type BinaryFn = fn(&Value, &Value) -> Result<Value>;

/// Evaluate children left to right, stopping at the first failure
fn evaluate_children(children: &[NodeRef], space: &mut VariableSpace) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(children.len());
    for child in children {
        values.push(child.evaluate(space)?);
    }
    Ok(values)
}

/// A natively implemented function applied to its evaluated arguments
pub struct BuiltInNode {
    name: String,
    return_type: VariableType,
    children: Vec<NodeRef>,
    body: BuiltInFn,
}

impl BuiltInNode {
    pub fn new(name: impl Into<String>, return_type: VariableType, children: Vec<NodeRef>, body: BuiltInFn) -> Self {
        Self {
            name: name.into(),
            return_type,
            children,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ExpressionNode for BuiltInNode {
    fn return_type(&self) -> VariableType {
        self.return_type
    }

    fn evaluate(&self, space: &mut VariableSpace) -> Result<Value> {
        space.nested(|space| {
            let arguments = evaluate_children(&self.children, space)?;
            (self.body)(&arguments)
        })
    }

    fn children(&self) -> &[NodeRef] {
        &self.children
    }
}

impl fmt::Debug for BuiltInNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltInNode")
            .field("name", &self.name)
            .field("return_type", &self.return_type)
            .field("children", &self.children)
            .finish()
    }
}

/// Infix operator with exactly two operands
pub struct BinaryNode {
    operator: &'static str,
    return_type: VariableType,
    operands: [NodeRef; 2],
    body: BinaryFn,
}

impl BinaryNode {
    pub fn new(operator: &'static str, return_type: VariableType, lhs: NodeRef, rhs: NodeRef, body: BinaryFn) -> Self {
        Self {
            operator,
            return_type,
            operands: [lhs, rhs],
            body,
        }
    }

    pub fn lhs(&self) -> &NodeRef {
        &self.operands[0]
    }

    pub fn rhs(&self) -> &NodeRef {
        &self.operands[1]
    }
}

impl ExpressionNode for BinaryNode {
    fn return_type(&self) -> VariableType {
        self.return_type
    }

    fn evaluate(&self, space: &mut VariableSpace) -> Result<Value> {
        space.nested(|space| {
            let lhs = self.lhs().evaluate(space)?;
            let rhs = self.rhs().evaluate(space)?;
            (self.body)(&lhs, &rhs)
        })
    }

    fn children(&self) -> &[NodeRef] {
        &self.operands
    }
}

impl fmt::Debug for BinaryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?} {} {:?})", self.lhs(), self.operator, self.rhs())
    }
}

/// A literal
#[derive(Debug)]
pub struct ConstantNode {
    value: Value,
}

impl ConstantNode {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl ExpressionNode for ConstantNode {
    fn return_type(&self) -> VariableType {
        self.value.variable_type()
    }

    fn evaluate(&self, _space: &mut VariableSpace) -> Result<Value> {
        Ok(self.value.clone())
    }
}

/// Reads a named parameter from the space
#[derive(Debug)]
pub struct VariableNode {
    name: String,
    variable_type: VariableType,
}

impl VariableNode {
    pub fn new(name: impl Into<String>, variable_type: VariableType) -> Self {
        Self {
            name: name.into(),
            variable_type,
        }
    }
}

impl ExpressionNode for VariableNode {
    fn return_type(&self) -> VariableType {
        self.variable_type
    }

    fn evaluate(&self, space: &mut VariableSpace) -> Result<Value> {
        space
            .get(&self.name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownVariable(self.name.clone()))
    }
}

/// `target.property`
pub struct DotReferenceNode {
    target: [NodeRef; 1],
    property: String,
    return_type: VariableType,
    registry: Arc<DotReferenceRegistry>,
}

impl DotReferenceNode {
    pub fn new(target: NodeRef, property: impl Into<String>, return_type: VariableType, registry: Arc<DotReferenceRegistry>) -> Self {
        Self {
            target: [target],
            property: property.into(),
            return_type,
            registry,
        }
    }
}

impl ExpressionNode for DotReferenceNode {
    fn return_type(&self) -> VariableType {
        self.return_type
    }

    fn evaluate(&self, space: &mut VariableSpace) -> Result<Value> {
        space.nested(|space| {
            let target = self.target[0].evaluate(space)?;
            match target {
                Value::Void => {
                    tracing::debug!(target: "mudprog::degraded", "Property {} read from a void value", self.property);
                    Ok(Value::default_for(self.return_type))
                }
                other => other.get_property(&self.property, &self.registry),
            }
        })
    }

    fn children(&self) -> &[NodeRef] {
        &self.target
    }
}

impl fmt::Debug for DotReferenceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}.{}", self.target[0], self.property)
    }
}

/// A collection literal
#[derive(Debug)]
pub struct CollectionNode {
    element_type: VariableType,
    items: Vec<NodeRef>,
}

impl CollectionNode {
    /// `element_type` must be a concrete single type; the compiler guarantees it
    pub fn new(element_type: VariableType, items: Vec<NodeRef>) -> Self {
        Self { element_type, items }
    }
}

impl ExpressionNode for CollectionNode {
    fn return_type(&self) -> VariableType {
        VariableType::Collection(self.element_type.kind())
    }

    fn evaluate(&self, space: &mut VariableSpace) -> Result<Value> {
        space.nested(|space| {
            let items = evaluate_children(&self.items, space)?;
            let kind = self.element_type.kind();
            // Void items of an entity collection become typed null references
            let items = items
                .into_iter()
                .map(|item| match item {
                    Value::Void if kind.is_entity() => Value::null_entity(kind),
                    other => other,
                })
                .collect();
            Ok(Value::Collection(ProgCollection::from_values(kind, items)?))
        })
    }

    fn children(&self) -> &[NodeRef] {
        &self.items
    }
}
