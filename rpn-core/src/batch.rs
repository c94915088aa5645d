//! Batch evaluation of independent expressions, one per line.
//!
//! Every line gets its own evaluator run, so a failing line never affects
//! its neighbours and results always come back in input order.

use crate::compat::{String, ToString, Vec};
use crate::error::CalcError;
use crate::evaluator::evaluate;
use crate::value::{SerdeValue, Value};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// 1-based position of the line in the batch.
    pub line: usize,
    pub expression: String,
    pub outcome: Result<Value, CalcError>,
}

impl BatchResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

// Serialized as {line, expression, result} or {line, expression, error, kind}
impl Serialize for BatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.outcome {
            Ok(result) => {
                let mut state = serializer.serialize_struct("BatchResult", 3)?;
                state.serialize_field("line", &self.line)?;
                state.serialize_field("expression", &self.expression)?;
                state.serialize_field("result", &SerdeValue(*result))?;
                state.end()
            }
            Err(err) => {
                let mut state = serializer.serialize_struct("BatchResult", 4)?;
                state.serialize_field("line", &self.line)?;
                state.serialize_field("expression", &self.expression)?;
                state.serialize_field("error", &err.to_string())?;
                state.serialize_field("kind", err.kind())?;
                state.end()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[BatchResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }
}

fn run_line(line: usize, expression: &str) -> BatchResult {
    BatchResult {
        line,
        expression: expression.to_string(),
        outcome: evaluate(expression),
    }
}

// RUST CONCEPT: Lazy iteration as cancellation
// Work happens only as results are pulled; a caller that stops iterating
// (or drops the iterator) cancels the rest of the batch between lines
pub fn batch_iter<I, S>(lines: I) -> impl Iterator<Item = BatchResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| run_line(index + 1, line.as_ref()))
}

pub fn run_batch<I, S>(lines: I) -> Vec<BatchResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let results: Vec<BatchResult> = lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| run_line(index + 1, line.as_ref()))
        .collect();

    let summary = BatchSummary::from_results(&results);
    info!(target: "rpn::batch", total = summary.total, failed = summary.failed, "batch complete");
    results
}

// Each worker takes one contiguous chunk; chunks are joined back in order,
// so the output matches the input regardless of which thread finishes first
#[cfg(feature = "std")]
pub fn run_batch_parallel<S>(lines: &[S], workers: usize) -> Vec<BatchResult>
where
    S: AsRef<str> + Sync,
{
    let workers = workers.max(1);
    if workers == 1 || lines.len() < 2 {
        return run_batch(lines);
    }

    let chunk_size = lines.len().div_ceil(workers);
    let results: Vec<BatchResult> = std::thread::scope(|scope| {
        let handles: Vec<_> = lines
            .chunks(chunk_size)
            .enumerate()
            .map(|(chunk_index, chunk)| {
                scope.spawn(move || {
                    let first_line = chunk_index * chunk_size + 1;
                    chunk
                        .iter()
                        .enumerate()
                        .map(|(offset, line)| run_line(first_line + offset, line.as_ref()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(chunk) => chunk,
                // evaluation does not panic; re-raise if a worker somehow did
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });

    let summary = BatchSummary::from_results(&results);
    info!(target: "rpn::batch", total = summary.total, failed = summary.failed, workers, "parallel batch complete");
    results
}

// RUST CONCEPT: Input normalisation for uploaded batch text
// - "\r\n" line endings are accepted
// - a line with commas keeps only its first field
// - leading and trailing blank lines are dropped; interior blank lines stay
//   and evaluate to EmptyExpression
pub fn batch_lines(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.split(',').next().unwrap_or(line).trim())
        .collect();

    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].to_vec(),
        _ => Vec::new(),
    }
}
