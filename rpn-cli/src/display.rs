// Text rendering for the REPL and the one-shot commands

use rpn_core::history::HistoryEntry;
use rpn_core::machine::DISPLAY_DEPTH;
use rpn_core::value::Display;
use rpn_core::{BatchResult, BatchSummary, Capabilities, DisplaySnapshot, Evaluation};

const ROW_WIDTH: usize = 24;

// Calculator-style panel: stack rows right-aligned, pending input last
//
//   3:                      0
//   2:                      3
//   1:                      4
//   >                      12
pub fn render_snapshot(snapshot: &DisplaySnapshot) -> String {
    let rows = snapshot.rows();
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let label = if i < DISPLAY_DEPTH {
            format!("{}:", DISPLAY_DEPTH - i)
        } else {
            ">".to_string()
        };
        out.push_str(&format!("  {:<3}{:>width$}\n", label, row, width = ROW_WIDTH));
    }
    out
}

pub fn render_evaluation(evaluation: &Evaluation, trace: bool) -> String {
    let mut out = String::new();
    if trace {
        for (step, operation) in evaluation.operations.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", step + 1, operation.describe()));
        }
    }
    out.push_str(&Display(evaluation.result).to_string());
    out
}

pub fn render_batch_result(result: &BatchResult) -> String {
    match &result.outcome {
        Ok(value) => format!("{:>4}  {} = {}", result.line, result.expression, Display(*value)),
        Err(e) => format!("{:>4}  {}  error: {}", result.line, result.expression, e),
    }
}

pub fn render_summary(summary: &BatchSummary) -> String {
    format!(
        "{} expressions, {} succeeded, {} failed",
        summary.total, summary.succeeded, summary.failed
    )
}

pub fn render_capabilities(caps: &Capabilities) -> String {
    format!(
        "Operators: {}\nFunctions: {}\nConstants: {}",
        caps.basic_operators.join(" "),
        caps.functions.join(" "),
        caps.constants.join(" ")
    )
}

pub fn render_history_entry(entry: &HistoryEntry) -> String {
    format!(
        "{:>5}  {}  {}",
        entry.id,
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.expression
    )
}
