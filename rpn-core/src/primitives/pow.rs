// Power primitive

use crate::error::CalcError;
use crate::value::Value;

#[cfg(not(feature = "std"))]
use num_traits::Float;

// Stack-based pow: ( base exponent -- base^exponent )
// NaN and infinite results are passed through, e.g. a negative base with a
// fractional exponent yields NaN
pub fn pow_impl(base: Value, exponent: Value) -> Result<Value, CalcError> {
    Ok(base.powf(exponent))
}
