// Single-shot expression evaluation
//
// EXECUTION MODEL:
// 1. Split the expression on whitespace, remembering where each token starts
// 2. Feed the tokens in order to a fresh SingleShot machine
// 3. The first error aborts the whole expression; there is no partial result
// 4. Exactly one value must remain on the stack at the end
//
// Stack commands (including undo) behave as in an interactive session;
// only the keypad edits `enter` and `backspace` are rejected, since every
// number token is pushed as soon as it is read.
//
// Nothing survives between calls, so evaluating the same text twice always
// gives the same answer.

use crate::classify::classify;
use crate::compat::{String, ToString, Vec};
use crate::error::CalcError;
use crate::machine::{Mode, StackMachine};
use crate::record::Operation;
use crate::tokenizer::tokenize;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of a traced evaluation: the value plus every operation applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub expression: String,
    #[serde(with = "crate::value::serde_value")]
    pub result: Value,
    pub operations: Vec<Operation>,
}

pub fn evaluate(expression: &str) -> Result<Value, CalcError> {
    evaluate_traced(expression).map(|evaluation| evaluation.result)
}

pub fn evaluate_traced(expression: &str) -> Result<Evaluation, CalcError> {
    debug!(target: "rpn::eval", expression, "evaluating");

    let mut machine = StackMachine::with_mode(Mode::SingleShot);
    let mut operations = Vec::new();

    for token in tokenize(expression) {
        let applied = machine.step(classify(token.text), token.text);
        match applied {
            Ok(Some(operation)) => operations.push(operation),
            Ok(None) => {}
            // the machine has no positions; attach the token's column here
            Err(CalcError::InvalidToken { token: text, .. }) => {
                return Err(CalcError::InvalidToken {
                    token: text,
                    column: token.pos.column,
                });
            }
            Err(err) => return Err(err),
        }
    }

    let result = match machine.stack() {
        [] => Err(CalcError::EmptyExpression),
        [value] => Ok(*value),
        values => Err(CalcError::IncompleteExpression {
            depth: values.len(),
        }),
    }?;

    debug!(target: "rpn::eval", expression, result, "evaluated");

    Ok(Evaluation {
        expression: expression.to_string(),
        result,
        operations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_basic() {
        assert_eq!(evaluate("3 4 +"), Ok(7.0));
        assert_eq!(evaluate("5 6 + 2 *"), Ok(22.0));
        assert_eq!(evaluate("2 3 ^"), Ok(8.0));
        assert_eq!(evaluate("  42  "), Ok(42.0));
    }

    #[test]
    fn test_evaluate_errors() {
        assert_eq!(evaluate("8 0 /"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("-1 sqrt"), Err(CalcError::NegativeSqrt));
        assert_eq!(evaluate("+"), Err(CalcError::InsufficientOperands { op: "+" }));
        assert_eq!(evaluate(""), Err(CalcError::EmptyExpression));
        assert_eq!(evaluate("   "), Err(CalcError::EmptyExpression));
        assert_eq!(
            evaluate("1 2 3 +"),
            Err(CalcError::IncompleteExpression { depth: 2 })
        );
    }

    #[test]
    fn test_evaluate_invalid_token_has_column() {
        assert_eq!(
            evaluate("3 4 plus"),
            Err(CalcError::InvalidToken {
                token: "plus".to_string(),
                column: 5,
            })
        );
    }

    #[test]
    fn test_error_aborts_before_later_tokens() {
        // the bad token comes after a division by zero, which wins
        assert_eq!(evaluate("1 0 / bad"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_evaluate_stack_commands() {
        assert_eq!(evaluate("2 10 swap -"), Ok(8.0));
        assert_eq!(evaluate("5 toggle-sign"), Ok(-5.0));
        assert_eq!(evaluate("1 2 clear 9"), Ok(9.0));
        assert_eq!(evaluate("undo"), Err(CalcError::NothingToUndo));
        assert!(matches!(evaluate("1 backspace"), Err(CalcError::InvalidToken { .. })));
    }

    #[test]
    fn test_undo_within_expression() {
        assert_eq!(evaluate("1 2 + 5 undo"), Ok(3.0));
        assert_eq!(evaluate("1 undo"), Err(CalcError::EmptyExpression));
        assert_eq!(
            evaluate("3 4 + undo"),
            Err(CalcError::IncompleteExpression { depth: 2 })
        );
        assert_eq!(evaluate("2 3 swap undo -"), Ok(-1.0));
        assert!(matches!(
            evaluate("7 backspace"),
            Err(CalcError::InvalidToken { ref token, column: 3 }) if token == "backspace"
        ));
    }

    #[test]
    fn test_evaluate_traced() {
        let evaluation = evaluate_traced("3 4 + 2 *").unwrap();
        assert_eq!(evaluation.result, 14.0);
        let operators: Vec<&str> = evaluation
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert_eq!(operators, ["+", "*"]);
        assert_eq!(evaluation.operations[0].operands, [3.0, 4.0]);
        assert_eq!(evaluation.operations[1].operands, [7.0, 2.0]);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        for expression in ["3 4 +", "8 0 /", "bad", "1 2"] {
            assert_eq!(evaluate(expression), evaluate(expression));
        }
    }
}
