// Division primitive

use crate::error::CalcError;
use crate::value::Value;

// RUST CONCEPT: Division with zero checking
// Stack-based division: ( a b -- a/b )
// Only an exact zero divisor fails; tiny divisors are allowed to overflow
pub fn div_impl(a: Value, b: Value) -> Result<Value, CalcError> {
    if b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(a / b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_impl() {
        assert_eq!(div_impl(20.0, 4.0), Ok(5.0));
        assert_eq!(div_impl(7.0, 2.0), Ok(3.5));
    }

    #[test]
    fn test_div_impl_by_zero() {
        assert_eq!(div_impl(8.0, 0.0), Err(CalcError::DivisionByZero));
        // -0.0 == 0.0 under IEEE-754 comparison
        assert_eq!(div_impl(8.0, -0.0), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_div_impl_tiny_divisor() {
        assert_eq!(div_impl(1.0, 1e-320), Ok(f64::INFINITY));
    }
}
