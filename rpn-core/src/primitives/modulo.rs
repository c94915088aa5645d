// Modulo primitive

use crate::error::CalcError;
use crate::value::Value;

// RUST CONCEPT: Floating point remainder
// Stack-based modulo: ( a b -- a%b )
// Rust's % on f64 truncates, so the sign of the result follows the dividend
pub fn mod_impl(a: Value, b: Value) -> Result<Value, CalcError> {
    if b == 0.0 {
        return Err(CalcError::ModuloByZero);
    }
    Ok(a % b)
}
