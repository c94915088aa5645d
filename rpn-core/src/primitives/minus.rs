// Subtraction primitive

use crate::error::CalcError;
use crate::value::Value;

// Stack-based subtraction: ( a b -- a-b )
pub fn sub_impl(a: Value, b: Value) -> Result<Value, CalcError> {
    Ok(a - b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_impl_operand_order() {
        assert_eq!(sub_impl(10.0, 3.0), Ok(7.0));
        assert_eq!(sub_impl(3.0, 10.0), Ok(-7.0));
    }
}
