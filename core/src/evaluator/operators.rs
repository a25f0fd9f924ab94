//! Implementations of the built-in operators.
//!
//! Each operator is a plain function over its already-evaluated operands.
//! The type checker guarantees operand types, so a mismatch here surfaces
//! as [`RuntimeError::UnsupportedOperand`] rather than a panic.

use core::cmp::Ordering;

use crate::evaluator::RuntimeError;
use crate::registry::{Fixity, OperatorKind};
use crate::values::{HostVar, Integer, Slot, Value, ValueType};

/// Signature shared by every operator implementation.
pub type OperatorFn = fn(&OperatorCall<'_>) -> Result<Value, RuntimeError>;

/// Operands and context handed to an [`OperatorFn`].
pub struct OperatorCall<'a> {
    pub symbol: &'static str,
    pub fixity: Fixity,
    pub result_type: ValueType,
    pub operands: &'a [&'a Slot],
}

impl OperatorCall<'_> {
    fn operand(&self, index: usize) -> Result<Value, RuntimeError> {
        self.operands
            .get(index)
            .map(|slot| slot.get())
            .ok_or(RuntimeError::MissingOperand(self.symbol))
    }

    /// The host variable the first operand aliases.
    fn target(&self) -> Result<&HostVar, RuntimeError> {
        self.operands
            .first()
            .and_then(|slot| slot.host())
            .ok_or(RuntimeError::NotAnLvalue(self.symbol))
    }

    fn unsupported(&self, value: &Value) -> RuntimeError {
        RuntimeError::UnsupportedOperand {
            op: self.symbol,
            ty: value.value_type(),
        }
    }
}

/// Function table installed into every new registry.
pub fn builtin_operator_fns() -> &'static [(OperatorKind, OperatorFn)] {
    BUILTIN_OPERATOR_FNS
}

static BUILTIN_OPERATOR_FNS: &[(OperatorKind, OperatorFn)] = &[
    (OperatorKind::Addition, addition),
    (OperatorKind::Subtraction, subtraction),
    (OperatorKind::Multiplication, multiplication),
    (OperatorKind::Division, division),
    (OperatorKind::Modulus, modulus),
    (OperatorKind::LeftShift, left_shift),
    (OperatorKind::RightShift, right_shift),
    (OperatorKind::BitwiseAnd, bitwise_and),
    (OperatorKind::BitwiseXor, bitwise_xor),
    (OperatorKind::BitwiseOr, bitwise_or),
    (OperatorKind::LessThan, less_than),
    (OperatorKind::GreaterThan, greater_than),
    (OperatorKind::LessOrEqual, less_or_equal),
    (OperatorKind::GreaterOrEqual, greater_or_equal),
    (OperatorKind::Equal, equal),
    (OperatorKind::NotEqual, not_equal),
    (OperatorKind::LogicalAnd, logical_and),
    (OperatorKind::LogicalOr, logical_or),
    (OperatorKind::Assignment, assignment),
    (OperatorKind::AddAssign, add_assign),
    (OperatorKind::SubtractAssign, subtract_assign),
    (OperatorKind::MultiplyAssign, multiply_assign),
    (OperatorKind::DivideAssign, divide_assign),
    (OperatorKind::ModulusAssign, modulus_assign),
    (OperatorKind::BitwiseAndAssign, bitwise_and_assign),
    (OperatorKind::BitwiseOrAssign, bitwise_or_assign),
    (OperatorKind::BitwiseXorAssign, bitwise_xor_assign),
    (OperatorKind::LeftShiftAssign, left_shift_assign),
    (OperatorKind::RightShiftAssign, right_shift_assign),
    (OperatorKind::LogicalNot, logical_not),
    (OperatorKind::Complement, complement),
    (OperatorKind::Increment, increment),
    (OperatorKind::Decrement, decrement),
    (OperatorKind::CastBool, cast),
    (OperatorKind::CastInt, cast),
    (OperatorKind::CastFloat, cast),
    (OperatorKind::CastString, cast),
];

macro_rules! operator_fns {
    ($($name:ident => $helper:ident($arg:expr);)*) => {
        $(
            fn $name(call: &OperatorCall<'_>) -> Result<Value, RuntimeError> {
                $helper(call, $arg)
            }
        )*
    };
}

operator_fns! {
    multiplication => arithmetic(Arith::Mul);
    division => arithmetic(Arith::Div);
    modulus => arithmetic(Arith::Rem);
    left_shift => arithmetic(Arith::Shl);
    right_shift => arithmetic(Arith::Shr);
    bitwise_and => arithmetic(Arith::And);
    bitwise_xor => arithmetic(Arith::Xor);
    bitwise_or => arithmetic(Arith::Or);
    less_than => compare(Ordering::is_lt);
    greater_than => compare(Ordering::is_gt);
    less_or_equal => compare(Ordering::is_le);
    greater_or_equal => compare(Ordering::is_ge);
    logical_and => logical(|a, b| a && b);
    logical_or => logical(|a, b| a || b);
    add_assign => compound(Arith::Add);
    subtract_assign => compound(Arith::Sub);
    multiply_assign => compound(Arith::Mul);
    divide_assign => compound(Arith::Div);
    modulus_assign => compound(Arith::Rem);
    bitwise_and_assign => compound(Arith::And);
    bitwise_or_assign => compound(Arith::Or);
    bitwise_xor_assign => compound(Arith::Xor);
    left_shift_assign => compound(Arith::Shl);
    right_shift_assign => compound(Arith::Shr);
    increment => step(1);
    decrement => step(-1);
}

fn equal(call: &OperatorCall<'_>) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(call.operand(0)? == call.operand(1)?))
}

fn not_equal(call: &OperatorCall<'_>) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(call.operand(0)? != call.operand(1)?))
}

#[derive(Debug, Clone, Copy)]
enum Arith {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    Or,
    Xor,
}

fn apply(call: &OperatorCall<'_>, op: Arith, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => integer_op(op, a, b).map(Value::Int),
        (Value::Float(a), Value::Float(b)) => match op {
            Arith::Add => Ok(Value::Float(a + b)),
            Arith::Sub => Ok(Value::Float(a - b)),
            Arith::Mul => Ok(Value::Float(a * b)),
            Arith::Div => Ok(Value::Float(a / b)),
            _ => Err(call.unsupported(&Value::Float(a))),
        },
        (Value::Str(mut a), Value::Str(b)) if matches!(op, Arith::Add) => {
            a.push_str(&b);
            Ok(Value::Str(a))
        }
        (left, _) => Err(call.unsupported(&left)),
    }
}

fn integer_op(op: Arith, a: Integer, b: Integer) -> Result<Integer, RuntimeError> {
    let checked = match op {
        Arith::Add => a.checked_add(b),
        Arith::Sub => a.checked_sub(b),
        Arith::Mul => a.checked_mul(b),
        Arith::Div | Arith::Rem if b == 0 => return Err(RuntimeError::DivisionByZero),
        Arith::Div => a.checked_div(b),
        Arith::Rem => a.checked_rem(b),
        Arith::Shl | Arith::Shr => {
            let amount = u32::try_from(b)
                .ok()
                .filter(|&n| n < Integer::BITS)
                .ok_or(RuntimeError::InvalidShift(b))?;
            return Ok(match op {
                Arith::Shl => a.wrapping_shl(amount),
                _ => a >> amount,
            });
        }
        Arith::And => Some(a & b),
        Arith::Or => Some(a | b),
        Arith::Xor => Some(a ^ b),
    };
    checked.ok_or(RuntimeError::IntegerOverflow)
}

fn addition(call: &OperatorCall<'_>) -> Result<Value, RuntimeError> {
    match call.fixity {
        Fixity::Binary => apply(call, Arith::Add, call.operand(0)?, call.operand(1)?),
        _ => call.operand(0),
    }
}

fn subtraction(call: &OperatorCall<'_>) -> Result<Value, RuntimeError> {
    match call.fixity {
        Fixity::Binary => apply(call, Arith::Sub, call.operand(0)?, call.operand(1)?),
        _ => match call.operand(0)? {
            Value::Int(i) => i.checked_neg().map(Value::Int).ok_or(RuntimeError::IntegerOverflow),
            Value::Float(f) => Ok(Value::Float(-f)),
            other => Err(call.unsupported(&other)),
        },
    }
}

fn arithmetic(call: &OperatorCall<'_>, op: Arith) -> Result<Value, RuntimeError> {
    apply(call, op, call.operand(0)?, call.operand(1)?)
}

fn compare(call: &OperatorCall<'_>, test: fn(Ordering) -> bool) -> Result<Value, RuntimeError> {
    let ordering = match (call.operand(0)?, call.operand(1)?) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(&b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(&b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(&b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(&b)),
        (left, _) => return Err(call.unsupported(&left)),
    };
    // NaN compares false against everything.
    Ok(Value::Bool(ordering.is_some_and(test)))
}

fn logical(call: &OperatorCall<'_>, f: fn(bool, bool) -> bool) -> Result<Value, RuntimeError> {
    match (call.operand(0)?, call.operand(1)?) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(f(a, b))),
        (left, _) => Err(call.unsupported(&left)),
    }
}

fn logical_not(call: &OperatorCall<'_>) -> Result<Value, RuntimeError> {
    match call.operand(0)? {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(call.unsupported(&other)),
    }
}

fn complement(call: &OperatorCall<'_>) -> Result<Value, RuntimeError> {
    match call.operand(0)? {
        Value::Int(i) => Ok(Value::Int(!i)),
        other => Err(call.unsupported(&other)),
    }
}

fn assignment(call: &OperatorCall<'_>) -> Result<Value, RuntimeError> {
    let target = call.target()?;
    target.set(call.operand(1)?)?;
    Ok(target.get())
}

fn compound(call: &OperatorCall<'_>, op: Arith) -> Result<Value, RuntimeError> {
    let target = call.target()?;
    let value = apply(call, op, target.get(), call.operand(1)?)?;
    target.set(value)?;
    Ok(target.get())
}

/// `++`/`--`: prefix yields the updated value, postfix the previous one.
fn step(call: &OperatorCall<'_>, delta: Integer) -> Result<Value, RuntimeError> {
    let target = call.target()?;
    let old = target.get();
    let new = match &old {
        Value::Int(i) => i.checked_add(delta).ok_or(RuntimeError::IntegerOverflow)?,
        other => return Err(call.unsupported(other)),
    };
    target.set(Value::Int(new))?;
    Ok(match call.fixity {
        Fixity::Postfix => old,
        _ => Value::Int(new),
    })
}

fn cast(call: &OperatorCall<'_>) -> Result<Value, RuntimeError> {
    call.operand(0)?.convert(call.result_type)
}
