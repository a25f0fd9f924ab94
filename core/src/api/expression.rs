//! Compiled calx expressions.

use tracing::debug;

use super::{CompileOptions, Error};
use crate::checker;
use crate::classifier;
use crate::diagnostics::CompileError;
use crate::evaluator;
use crate::lexer;
use crate::registry::Registry;
use crate::tree::{self, NodeId, Tree};
use crate::values::{Value, ValueType};

/// A type-checked expression tree ready for repeated evaluation.
///
/// The tree keeps live handles to the host variables it names, so an
/// evaluation always sees their current values.
///
/// # Example
///
/// ```
/// use calx_core::api::{CompileOptions, CompiledExpression};
/// use calx_core::registry::Registry;
/// use calx_core::{Integer, Shared, Value};
///
/// let mut registry = Registry::new();
/// let x = Shared::new(20 as Integer);
/// registry.register_variable("x", &x).unwrap();
///
/// let mut expr = CompiledExpression::compile(&registry, &CompileOptions::default(), "x * 2 + 2").unwrap();
/// assert_eq!(expr.evaluate(&registry).unwrap(), Value::Int(42));
///
/// x.set(1);
/// assert_eq!(expr.evaluate(&registry).unwrap(), Value::Int(4));
/// ```
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    source: String,
    tree: Tree,
    /// Post-order walk shared by the checker and every evaluation.
    order: Vec<NodeId>,
}

impl CompiledExpression {
    /// Runs the lexer, classifier, tree builder and type checker.
    pub fn compile(
        registry: &Registry,
        options: &CompileOptions,
        source: &str,
    ) -> Result<Self, Error> {
        debug!(source, "Compiling expression");
        let (tree, order) = run_stages(registry, options, source).map_err(|err| {
            debug!(error = %err, "Compilation failed");
            Error::from(err.with_source(source))
        })?;
        Ok(Self {
            source: source.to_string(),
            tree,
            order,
        })
    }

    pub fn evaluate(&mut self, registry: &Registry) -> Result<Value, Error> {
        evaluator::evaluate(&mut self.tree, &self.order, registry)
            .map_err(|err| Error::from(err.with_source(&self.source)))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn result_type(&self) -> ValueType {
        self.tree
            .result()
            .map_or(ValueType::Void, |id| self.tree.node(id).ty)
    }

    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The tree as an s-expression, e.g. `(+ 1 (* 2 3))`.
    pub fn to_sexpr(&self) -> String {
        self.tree.to_sexpr(&self.source)
    }
}

fn run_stages(
    registry: &Registry,
    options: &CompileOptions,
    source: &str,
) -> Result<(Tree, Vec<NodeId>), CompileError> {
    let mut lexemes = lexer::tokenize(registry, source)?;
    classifier::classify(registry, &mut lexemes)?;
    let mut tree = tree::build_tree(lexemes, source, options)?;
    let order = tree.post_order();
    checker::check(&mut tree, &order, registry)?;
    Ok((tree, order))
}
