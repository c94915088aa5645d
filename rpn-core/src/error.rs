//! Calculator error kinds.
//!
//! Every failure the machine, evaluator or batch runner can report is a
//! variant of [`CalcError`]. They are all recoverable: a failed operation
//! leaves the machine state untouched and hands the error back as a value.

use crate::compat::String;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Modulo by zero")]
    ModuloByZero,

    #[error("Cannot calculate square root of a negative number")]
    NegativeSqrt,

    #[error("Cannot calculate logarithm of zero or a negative number")]
    NonPositiveLog,

    #[error("Factorial is only defined for integers from 0 to 170")]
    FactorialDomain,

    /// `op` is the canonical name of the word that was short of operands.
    #[error("Insufficient operands for '{op}'")]
    InsufficientOperands { op: &'static str },

    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("No value to toggle sign")]
    NoValueToToggle,

    #[error("Invalid token '{token}' at column {column}")]
    InvalidToken { token: String, column: usize },

    #[error("Expression is empty")]
    EmptyExpression,

    /// Evaluation finished with more than one value left on the stack.
    #[error("Incomplete expression: {depth} values left on the stack")]
    IncompleteExpression { depth: usize },
}

impl CalcError {
    /// Stable name of the error kind, used as the `kind` field in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::DivisionByZero => "DivisionByZero",
            CalcError::ModuloByZero => "ModuloByZero",
            CalcError::NegativeSqrt => "NegativeSqrt",
            CalcError::NonPositiveLog => "NonPositiveLog",
            CalcError::FactorialDomain => "FactorialDomain",
            CalcError::InsufficientOperands { .. } => "InsufficientOperands",
            CalcError::InvalidNumber(_) => "InvalidNumber",
            CalcError::NothingToUndo => "NothingToUndo",
            CalcError::NoValueToToggle => "NoValueToToggle",
            CalcError::InvalidToken { .. } => "InvalidToken",
            CalcError::EmptyExpression => "EmptyExpression",
            CalcError::IncompleteExpression { .. } => "IncompleteExpression",
        }
    }
}
