// Tangent primitive

use crate::error::CalcError;
use crate::value::Value;

#[cfg(not(feature = "std"))]
use num_traits::Float;

// Stack-based tan: ( degrees -- tan(degrees) )
// tan(90) is not special-cased; it yields a very large finite value
pub fn tan_impl(degrees: Value) -> Result<Value, CalcError> {
    Ok(degrees.to_radians().tan())
}
