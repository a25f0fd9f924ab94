//! Adapters that turn plain Rust functions into registry callables.
//!
//! Host functions are stored type-erased as [`NativeFn`]. Closures with
//! [`Scalar`] parameters can be registered directly through
//! [`HostFunction`], which records their signature and unpacks arguments.

use crate::evaluator::RuntimeError;
use crate::values::{Float, Integer, Scalar, Value, ValueType};

/// Type-erased host function body.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, RuntimeError>;

/// Values a host function may return.
pub trait ReturnValue: 'static {
    const TYPE: ValueType;

    fn into_return(self) -> Value;
}

impl ReturnValue for () {
    const TYPE: ValueType = ValueType::Void;

    fn into_return(self) -> Value {
        Value::Void
    }
}

macro_rules! impl_return_value {
    ($($ty:ty),*) => {
        $(
            impl ReturnValue for $ty {
                const TYPE: ValueType = <$ty as Scalar>::TYPE;

                fn into_return(self) -> Value {
                    self.into_value()
                }
            }
        )*
    };
}

impl_return_value!(bool, Integer, Float, String);

/// A Rust callable with a signature the registry can describe.
///
/// `Args` is a tuple of the parameter types; it only exists to keep the
/// per-arity implementations apart.
pub trait HostFunction<Args>: 'static {
    fn return_type() -> ValueType;

    fn param_types() -> Vec<ValueType>;

    fn invoke(&self, args: &[Value]) -> Result<Value, RuntimeError>;
}

macro_rules! impl_host_function {
    ($($arg:ident $val:ident),*) => {
        impl<Func, Ret, $($arg),*> HostFunction<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Ret + 'static,
            Ret: ReturnValue,
            $($arg: Scalar,)*
        {
            fn return_type() -> ValueType {
                Ret::TYPE
            }

            fn param_types() -> Vec<ValueType> {
                vec![$(<$arg as Scalar>::TYPE),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn invoke(&self, args: &[Value]) -> Result<Value, RuntimeError> {
                let expected = Self::param_types().len();
                if args.len() != expected {
                    return Err(RuntimeError::ArgumentCount {
                        expected,
                        found: args.len(),
                    });
                }
                let mut args = args.iter();
                $(
                    let $val = args
                        .next()
                        .and_then(<$arg as Scalar>::from_value)
                        .ok_or(RuntimeError::ArgumentType {
                            expected: <$arg as Scalar>::TYPE,
                        })?;
                )*
                Ok((self)($($val),*).into_return())
            }
        }
    };
}

impl_host_function!();
impl_host_function!(A a);
impl_host_function!(A a, B b);
impl_host_function!(A a, B b, C c);
impl_host_function!(A a, B b, C c, D d);

#[cfg(test)]
mod tests {
    use super::*;

    fn describe<Args, F: HostFunction<Args>>(_: &F) -> (Vec<ValueType>, ValueType) {
        (F::param_types(), F::return_type())
    }

    #[test]
    fn signature_is_derived_from_closure_types() {
        let f = |a: Integer, b: Float| a as Float + b;
        assert_eq!(
            describe(&f),
            (vec![ValueType::Integer, ValueType::Float], ValueType::Float)
        );

        let g = |_: String| {};
        assert_eq!(describe(&g), (vec![ValueType::String], ValueType::Void));
    }

    #[test]
    fn invoke_unpacks_arguments() {
        let concat = |a: String, b: String| format!("{a}{b}");
        let result = HostFunction::invoke(&concat, &[Value::from("ab"), Value::from("cd")]);
        assert_eq!(result, Ok(Value::from("abcd")));
    }

    #[test]
    fn invoke_rejects_wrong_argument_type() {
        let negate = |b: bool| !b;
        let result = HostFunction::invoke(&negate, &[Value::Int(1)]);
        assert_eq!(
            result,
            Err(RuntimeError::ArgumentType {
                expected: ValueType::Boolean
            })
        );
    }

    #[test]
    fn invoke_rejects_wrong_arity() {
        let answer = || 42 as Integer;
        let result = HostFunction::invoke(&answer, &[Value::Int(1)]);
        assert_eq!(
            result,
            Err(RuntimeError::ArgumentCount {
                expected: 0,
                found: 1
            })
        );
    }
}
