//! Calculation records and the sink seam used to hand them to persistence.

use crate::builtins::{self, Word};
use crate::compat::{format, String, Vec};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One completed interactive calculation, e.g. `3 + 4 = 7` with result 7.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub expression: String,
    #[serde(with = "crate::value::serde_value")]
    pub result: Value,
}

/// A single operator or function application observed during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub operator: String,
    #[serde(with = "crate::value::serde_values")]
    pub operands: Vec<Value>,
    #[serde(with = "crate::value::serde_value")]
    pub result: Value,
}

impl Operation {
    /// Display text for this application, in the form used by calculation records.
    pub fn describe(&self) -> String {
        let word = builtins::lookup(&self.operator).map(|entry| entry.word);
        match (word, self.operands.as_slice()) {
            (Some(Word::Binary(op)), &[a, b]) => op.describe(a, b, self.result),
            (Some(Word::Unary(op)), &[n]) => op.describe(n, self.result),
            _ => format!("{} {:?} = {}", self.operator, self.operands, self.result),
        }
    }

    pub fn to_record(&self) -> CalculationRecord {
        CalculationRecord {
            expression: self.describe(),
            result: self.result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record sink failed: {0}")]
pub struct SinkError(pub String);

// RUST CONCEPT: Fire-and-forget notification seam
// The machine calls notify once per completed calculation and only logs a
// failure; the sink must not block (send on a channel, push to a buffer)
pub trait RecordSink: Send {
    fn notify(&mut self, record: &CalculationRecord) -> Result<(), SinkError>;
}

impl<F> RecordSink for F
where
    F: FnMut(&CalculationRecord) -> Result<(), SinkError> + Send,
{
    fn notify(&mut self, record: &CalculationRecord) -> Result<(), SinkError> {
        self(record)
    }
}
