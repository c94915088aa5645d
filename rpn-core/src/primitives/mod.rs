// Primitives module - the numeric operation library
//
// Each primitive is a pure function over f64 operands that returns the result
// or the specific CalcError for its domain. The enums below are the fixed
// catalogs the classifier recognizes; dispatch goes through `apply`.

use crate::compat::{format, String};
use crate::error::CalcError;
use crate::value::{Display, Value};

// Arithmetic
pub mod plus;
pub mod minus;
pub mod multiply;
pub mod divide;
pub mod modulo;
pub mod pow;

// Functions
pub mod sqrt;
pub mod sin;
pub mod cos;
pub mod tan;
pub mod log;
pub mod factorial;

// Constants
pub mod constants;

/// Operators taking two operands: ( a b -- result ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 6] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Pow,
        BinaryOp::Mod,
    ];

    /// Canonical token for this operator.
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "pow",
            BinaryOp::Mod => "%",
        }
    }

    // Symbol used in calculation record text
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "×",
            BinaryOp::Div => "÷",
            BinaryOp::Pow => "^",
            BinaryOp::Mod => "%",
        }
    }

    pub fn apply(self, a: Value, b: Value) -> Result<Value, CalcError> {
        match self {
            BinaryOp::Add => plus::add_impl(a, b),
            BinaryOp::Sub => minus::sub_impl(a, b),
            BinaryOp::Mul => multiply::mul_impl(a, b),
            BinaryOp::Div => divide::div_impl(a, b),
            BinaryOp::Pow => pow::pow_impl(a, b),
            BinaryOp::Mod => modulo::mod_impl(a, b),
        }
    }

    /// Human readable form of a completed application, e.g. `3 × 4 = 12`.
    pub fn describe(self, a: Value, b: Value, result: Value) -> String {
        format!(
            "{} {} {} = {}",
            Display(a),
            self.symbol(),
            Display(b),
            Display(result)
        )
    }
}

/// Functions taking one operand: ( n -- result ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Sqrt,
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
    Factorial,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 7] = [
        UnaryOp::Sqrt,
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
        UnaryOp::Log,
        UnaryOp::Ln,
        UnaryOp::Factorial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Log => "log",
            UnaryOp::Ln => "ln",
            UnaryOp::Factorial => "!",
        }
    }

    pub fn apply(self, n: Value) -> Result<Value, CalcError> {
        match self {
            UnaryOp::Sqrt => sqrt::sqrt_impl(n),
            UnaryOp::Sin => sin::sin_impl(n),
            UnaryOp::Cos => cos::cos_impl(n),
            UnaryOp::Tan => tan::tan_impl(n),
            UnaryOp::Log => log::log10_impl(n),
            UnaryOp::Ln => log::ln_impl(n),
            UnaryOp::Factorial => factorial::factorial_impl(n),
        }
    }

    /// Human readable form of a completed application, e.g. `sqrt(9) = 3`.
    pub fn describe(self, n: Value, result: Value) -> String {
        match self {
            UnaryOp::Factorial => format!("{}! = {}", Display(n), Display(result)),
            _ => format!("{}({}) = {}", self.name(), Display(n), Display(result)),
        }
    }
}

/// Zero-arity words: ( -- value ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub const ALL: [Constant; 2] = [Constant::Pi, Constant::E];

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }

    pub fn value(self) -> Value {
        match self {
            Constant::Pi => constants::pi_impl(),
            Constant::E => constants::e_impl(),
        }
    }
}
