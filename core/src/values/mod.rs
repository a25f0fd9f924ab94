//! Runtime values and the host-side storage expressions operate on.

pub mod function;
pub mod host;
pub mod value;

pub use function::{HostFunction, NativeFn, ReturnValue};
pub use host::{HostVar, Shared, Slot};
pub use value::{Float, Integer, Scalar, TypeMask, Value, ValueType};
