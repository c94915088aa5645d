// Logarithm primitives

use crate::error::CalcError;
use crate::value::Value;

#[cfg(not(feature = "std"))]
use num_traits::Float;

// RUST CONCEPT: Logarithms with domain checking
// Stack-based log: ( n -- log10(n) )
pub fn log10_impl(n: Value) -> Result<Value, CalcError> {
    if n <= 0.0 {
        return Err(CalcError::NonPositiveLog);
    }
    Ok(n.log10())
}

// Stack-based ln: ( n -- ln(n) )
pub fn ln_impl(n: Value) -> Result<Value, CalcError> {
    if n <= 0.0 {
        return Err(CalcError::NonPositiveLog);
    }
    Ok(n.ln())
}
