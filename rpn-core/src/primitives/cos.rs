// Cosine primitive

use crate::error::CalcError;
use crate::value::Value;

#[cfg(not(feature = "std"))]
use num_traits::Float;

// Stack-based cos: ( degrees -- cos(degrees) )
pub fn cos_impl(degrees: Value) -> Result<Value, CalcError> {
    Ok(degrees.to_radians().cos())
}
