// Factorial primitive

use crate::error::CalcError;
use crate::value::Value;

#[cfg(not(feature = "std"))]
use num_traits::Float;

// 170! is the largest factorial that fits in an f64
pub const MAX_FACTORIAL: Value = 170.0;

// RUST CONCEPT: Integrality check on a float
// Stack-based factorial: ( n -- n! )
// The product starts at 1 over an empty range for 0 and 1, so both give 1
pub fn factorial_impl(n: Value) -> Result<Value, CalcError> {
    if n < 0.0 || n > MAX_FACTORIAL || n.floor() != n {
        return Err(CalcError::FactorialDomain);
    }

    let n = n as u32;
    Ok((2..=n).fold(1.0, |acc, k| acc * k as Value))
}
