// Constant primitives
// Stack-based constants: ( -- pi ) and ( -- e )

use crate::value::Value;

pub fn pi_impl() -> Value {
    core::f64::consts::PI
}

pub fn e_impl() -> Value {
    core::f64::consts::E
}
