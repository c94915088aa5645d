// Square root primitive

use crate::error::CalcError;
use crate::value::Value;

// RUST CONCEPT: Float trait needed for no_std environments
// In std environments, f64 has these methods built-in
// In no_std, we need the Float trait from num_traits with libm
#[cfg(not(feature = "std"))]
use num_traits::Float;

// RUST CONCEPT: Square root with domain checking
// Stack-based sqrt: ( n -- sqrt(n) )
pub fn sqrt_impl(n: Value) -> Result<Value, CalcError> {
    if n < 0.0 {
        return Err(CalcError::NegativeSqrt);
    }
    Ok(n.sqrt())
}
