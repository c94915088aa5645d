// Addition primitive

use crate::error::CalcError;
use crate::value::Value;

// Stack-based addition: ( a b -- a+b )
// Overflow is not checked; +/-Infinity is a valid, propagating result
pub fn add_impl(a: Value, b: Value) -> Result<Value, CalcError> {
    Ok(a + b)
}
