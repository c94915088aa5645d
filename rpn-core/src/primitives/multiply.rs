// Multiplication primitive

use crate::error::CalcError;
use crate::value::Value;

// Stack-based multiplication: ( a b -- a*b )
pub fn mul_impl(a: Value, b: Value) -> Result<Value, CalcError> {
    Ok(a * b)
}
