//! Bottom-up type checking.
//!
//! Operands of a binary operator must have identical types; there is no
//! implicit conversion. Function arguments must match the registered
//! parameter types exactly.

use smallvec::SmallVec;
use tracing::debug;

use crate::diagnostics::{CompileError, CompileErrorKind};
use crate::registry::{Fixity, OperatorForm, OperatorInfo, Registry, ResultType};
use crate::syntax::Span;
use crate::tree::{NodeId, NodeKind, Tree};
use crate::values::ValueType;

struct ChildInfo {
    ty: ValueType,
    span: Span,
    is_variable: bool,
}

/// Assigns a type to every node in `order`, which must list children first.
pub fn check(tree: &mut Tree, order: &[NodeId], registry: &Registry) -> Result<(), CompileError> {
    for &id in order {
        let node = tree.node(id);
        let children: SmallVec<[ChildInfo; 2]> = node
            .children
            .iter()
            .map(|&child| {
                let child = tree.node(child);
                ChildInfo {
                    ty: child.ty,
                    span: child.span.clone(),
                    is_variable: matches!(child.kind, NodeKind::Variable { .. }),
                }
            })
            .collect();
        let ty = match &node.kind {
            NodeKind::Constant | NodeKind::Variable { .. } => continue,
            NodeKind::Root => children.first().map_or(ValueType::Void, |child| child.ty),
            NodeKind::Operator { info, fixity } => {
                check_operator(info, *fixity, &node.span, &children)?
            }
            NodeKind::FunctionCall { name } => {
                check_function(registry, name, &node.span, &children)?
            }
        };
        tree.node_mut(id).ty = ty;
    }
    if let Some(result) = tree.result() {
        debug!(ty = %tree.node(result).ty, "Type checked expression");
    }
    Ok(())
}

fn check_operator(
    info: &OperatorInfo,
    fixity: Fixity,
    span: &Span,
    children: &[ChildInfo],
) -> Result<ValueType, CompileError> {
    let op = info.symbol.to_string();
    let expected = fixity.operand_count();
    if children.len() != expected {
        return Err(CompileError::new(
            CompileErrorKind::OperandCount {
                op,
                expected,
                found: children.len(),
            },
            span.clone(),
        ));
    }

    let first = &children[0];
    if !info.operand_types.accepts(first.ty) {
        return Err(CompileError::new(
            CompileErrorKind::UnsupportedOperandType { op, ty: first.ty },
            first.span.clone(),
        )
        .with_related(span.clone(), format!("{} operator", info.symbol)));
    }
    if let Some(second) = children.get(1) {
        if second.ty != first.ty {
            return Err(CompileError::new(
                CompileErrorKind::OperandTypeMismatch {
                    op,
                    left: first.ty,
                    right: second.ty,
                },
                span.clone(),
            )
            .with_related(first.span.clone(), format!("this is {}", first.ty))
            .with_related(second.span.clone(), format!("this is {}", second.ty)));
        }
    }
    if info.form.contains(OperatorForm::LVALUE_ONLY) && !first.is_variable {
        return Err(CompileError::new(
            CompileErrorKind::NotAnLvalue(op),
            first.span.clone(),
        ));
    }

    Ok(match info.result {
        ResultType::SameAsOperand => first.ty,
        ResultType::Fixed(ty) => ty,
    })
}

fn check_function(
    registry: &Registry,
    name: &str,
    span: &Span,
    children: &[ChildInfo],
) -> Result<ValueType, CompileError> {
    let function = registry.function(name).ok_or_else(|| {
        CompileError::new(CompileErrorKind::UnknownFunction(name.to_string()), span.clone())
    })?;
    let params = function.params();
    if params.len() != children.len() {
        return Err(CompileError::new(
            CompileErrorKind::ArityMismatch {
                name: name.to_string(),
                expected: params.len(),
                found: children.len(),
            },
            span.clone(),
        ));
    }
    for (index, (param, arg)) in params.iter().zip(children).enumerate() {
        if *param != arg.ty {
            return Err(CompileError::new(
                CompileErrorKind::ArgumentType {
                    name: name.to_string(),
                    index: index + 1,
                    expected: *param,
                    found: arg.ty,
                },
                arg.span.clone(),
            ));
        }
    }
    Ok(function.return_type())
}
