//! Token classification.
//!
//! A raw token is either a number, one of the words in the builtin
//! dictionary, or unrecognized. What happens to an unrecognized token is up
//! to the caller: the interactive machine treats it as typed characters, the
//! evaluator rejects it.

use crate::builtins::{self, StackCommand, Word};
use crate::primitives::{BinaryOp, Constant, UnaryOp};
use crate::value::{parse_number, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Category {
    Number(Value),
    Binary(BinaryOp),
    Unary(UnaryOp),
    Constant(Constant),
    Command(StackCommand),
    Unrecognized,
}

impl Category {
    /// Operand count of an arithmetic word: 2 for binary operators, 1 for
    /// unary functions, 0 for constants.
    ///
    /// Only meaningful for arithmetic words. Numbers, unrecognized tokens and
    /// stack commands also report 0, even though `swap` rearranges two entries
    /// and `clear` removes them all.
    pub fn arity(&self) -> usize {
        match self {
            Category::Binary(_) => 2,
            Category::Unary(_) => 1,
            _ => 0,
        }
    }
}

impl From<Word> for Category {
    fn from(word: Word) -> Self {
        match word {
            Word::Binary(op) => Category::Binary(op),
            Word::Unary(op) => Category::Unary(op),
            Word::Constant(c) => Category::Constant(c),
            Word::Command(cmd) => Category::Command(cmd),
        }
    }
}

// Numbers are tried first so "-5" is a number while a lone "-" is subtraction
pub fn classify(token: &str) -> Category {
    if let Some(n) = parse_number(token) {
        return Category::Number(n);
    }

    builtins::lookup(token)
        .map(|entry| Category::from(entry.word))
        .unwrap_or(Category::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numbers() {
        assert_eq!(classify("42"), Category::Number(42.0));
        assert_eq!(classify("-2.5"), Category::Number(-2.5));
        assert_eq!(classify(".5"), Category::Number(0.5));
    }

    #[test]
    fn test_classify_minus_is_operator() {
        assert_eq!(classify("-"), Category::Binary(BinaryOp::Sub));
    }

    #[test]
    fn test_classify_words() {
        assert_eq!(classify("pow"), Category::Binary(BinaryOp::Pow));
        assert_eq!(classify("%"), Category::Binary(BinaryOp::Mod));
        assert_eq!(classify("!"), Category::Unary(UnaryOp::Factorial));
        assert_eq!(classify("ln"), Category::Unary(UnaryOp::Ln));
        assert_eq!(classify("pi"), Category::Constant(Constant::Pi));
        assert_eq!(classify("undo"), Category::Command(StackCommand::Undo));
        assert_eq!(classify("toggle-sign"), Category::Command(StackCommand::ToggleSign));
    }

    #[test]
    fn test_classify_unrecognized() {
        for token in ["bad", "1e5", "inf", ".", "3x", "SQRT"] {
            assert_eq!(classify(token), Category::Unrecognized, "{}", token);
        }
    }

    #[test]
    fn test_arity() {
        assert_eq!(classify("+").arity(), 2);
        assert_eq!(classify("sqrt").arity(), 1);
        assert_eq!(classify("e").arity(), 0);
        // not arithmetic: no operand count
        assert_eq!(classify("swap").arity(), 0);
        assert_eq!(classify("3").arity(), 0);
    }
}
