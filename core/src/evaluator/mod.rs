//! Post-order evaluation of a checked tree.
//!
//! Every node stores its result in its [`Slot`]. Constants already hold
//! their value, variables alias host storage, and operators and function
//! calls overwrite their slot on each run, so a tree can be evaluated any
//! number of times.

mod error;
pub mod operators;

pub use error::{ExecutionError, RuntimeError};

use smallvec::SmallVec;
use tracing::debug;

use crate::registry::{Registry, ResultType};
use crate::tree::{NodeId, NodeKind, Tree};
use crate::values::{Slot, Value};

use operators::OperatorCall;

/// Evaluates `tree` in `order`, which must list children before parents.
///
/// Children are evaluated strictly left to right and `&&`/`||` do not
/// short-circuit, so side effects on both sides always happen.
pub fn evaluate(tree: &mut Tree, order: &[NodeId], registry: &Registry) -> Result<Value, ExecutionError> {
    for &id in order {
        let slot = {
            let node = tree.node(id);
            let at = |kind: RuntimeError| ExecutionError::new(kind, node.span.clone());
            match &node.kind {
                NodeKind::Root | NodeKind::Constant => continue,
                NodeKind::Variable { name } => {
                    // Pick up re-registrations made since compilation.
                    let var = registry
                        .variable(name)
                        .ok_or_else(|| at(RuntimeError::VariableUnbound(name.clone())))?;
                    if var.value_type() != node.ty {
                        return Err(at(RuntimeError::VariableRebound {
                            name: name.clone(),
                            expected: node.ty,
                            found: var.value_type(),
                        }));
                    }
                    Slot::Aliased(var.clone())
                }
                NodeKind::Operator { info, fixity } => {
                    let f = registry
                        .operator_fn(info.kind)
                        .ok_or_else(|| at(RuntimeError::MissingOperator(info.symbol)))?;
                    let operands: SmallVec<[&Slot; 2]> = node
                        .children
                        .iter()
                        .map(|&child| &tree.node(child).slot)
                        .collect();
                    let result_type = match info.result {
                        ResultType::Fixed(ty) => ty,
                        ResultType::SameAsOperand => node.ty,
                    };
                    let call = OperatorCall {
                        symbol: info.symbol,
                        fixity: *fixity,
                        result_type,
                        operands: &operands,
                    };
                    Slot::Owned(f(&call).map_err(at)?)
                }
                NodeKind::FunctionCall { name } => {
                    let args: Vec<Value> = node
                        .children
                        .iter()
                        .map(|&child| tree.node(child).slot.get())
                        .collect();
                    let value = registry.call_function(name, &args).map_err(at)?;
                    if value.value_type() != node.ty {
                        return Err(at(RuntimeError::ReturnType {
                            name: name.clone(),
                            expected: node.ty,
                            found: value.value_type(),
                        }));
                    }
                    Slot::Owned(value)
                }
            }
        };
        tree.node_mut(id).slot = slot;
    }

    let value = tree
        .result()
        .map_or(Value::Void, |result| tree.node(result).slot.get());
    debug!(result = %value, ty = %value.value_type(), "Evaluated expression");
    Ok(value)
}
