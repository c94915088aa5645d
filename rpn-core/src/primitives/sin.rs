// Sine primitive

use crate::error::CalcError;
use crate::value::Value;

#[cfg(not(feature = "std"))]
use num_traits::Float;

// Stack-based sin: ( degrees -- sin(degrees) )
pub fn sin_impl(degrees: Value) -> Result<Value, CalcError> {
    Ok(degrees.to_radians().sin())
}
