use crate::builtins::StackCommand;
use crate::classify::{classify, Category};
use crate::compat::{Box, String, ToString, Vec, format};
use crate::error::CalcError;
use crate::primitives::{BinaryOp, UnaryOp};
use crate::record::{CalculationRecord, Operation, RecordSink};
use crate::value::{parse_number, Display, Value};
use tracing::{debug, warn};

// Number of stack rows an interactive display shows above the pending row
pub const DISPLAY_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Numbers are typed into the pending input and pushed with Enter or
    /// consumed by the next operator; unknown tokens are typed characters.
    Interactive,
    /// Numbers are pushed directly and unknown tokens are rejected.
    SingleShot,
}

/// Copy of the machine state handed back after each successful `apply`.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    pub stack: Vec<Value>,
    pub pending: String,
}

impl DisplaySnapshot {
    // Rolling view: the top DISPLAY_DEPTH stack values, deepest first, with
    // "0" filler when the stack is shallower, then the pending row
    pub fn rows(&self) -> [String; DISPLAY_DEPTH + 1] {
        let mut rows: [String; DISPLAY_DEPTH + 1] = Default::default();
        for (i, row) in rows.iter_mut().take(DISPLAY_DEPTH).enumerate() {
            let depth_from_top = DISPLAY_DEPTH - 1 - i;
            *row = match self.stack.len().checked_sub(depth_from_top + 1) {
                Some(index) => Display(self.stack[index]).to_string(),
                None => "0".to_string(),
            };
        }
        rows[DISPLAY_DEPTH] = if self.pending.is_empty() {
            "0".to_string()
        } else {
            self.pending.clone()
        };
        rows
    }

    pub fn top(&self) -> Option<Value> {
        self.stack.last().copied()
    }
}

// RUST CONCEPT: Explicit session object
// The stack, pending input and undo log are owned by one machine value;
// there is no shared or global state, so independent sessions never interact
pub struct StackMachine {
    stack: Vec<Value>,
    undo_log: Vec<Vec<Value>>,
    pending: String,
    mode: Mode,
    records: Vec<CalculationRecord>,
    last_error: Option<CalcError>,
    sink: Option<Box<dyn RecordSink>>,
}

impl Default for StackMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StackMachine {
    /// A fresh interactive session.
    pub fn new() -> Self {
        Self::with_mode(Mode::Interactive)
    }

    pub fn with_mode(mode: Mode) -> Self {
        Self {
            stack: Vec::new(),
            undo_log: Vec::new(),
            pending: String::new(),
            mode,
            records: Vec::new(),
            last_error: None,
            sink: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_log.len()
    }

    /// Calculations completed in this session, oldest first.
    pub fn records(&self) -> &[CalculationRecord] {
        &self.records
    }

    /// The error from the most recent failed `apply`, until the next success or `clear`.
    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    /// Route every completed calculation to `sink` as well as the in-memory log.
    pub fn set_record_sink(&mut self, sink: Box<dyn RecordSink>) {
        self.sink = Some(sink);
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            stack: self.stack.clone(),
            pending: self.pending.clone(),
        }
    }

    /// Classify `token` and apply it.
    pub fn apply_token(&mut self, token: &str) -> Result<DisplaySnapshot, CalcError> {
        self.apply(classify(token), token)
    }

    pub fn apply(&mut self, category: Category, token: &str) -> Result<DisplaySnapshot, CalcError> {
        match self.step(category, token) {
            Ok(operation) => {
                self.last_error = None;
                if let Some(operation) = operation
                    && self.mode == Mode::Interactive
                {
                    self.publish(operation.to_record());
                }
                Ok(self.snapshot())
            }
            Err(err) => {
                debug!(target: "rpn::machine", token, error = %err, "token rejected");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // Apply one token without touching records or the displayed error.
    // Returns the operation performed, if the token was an operator or function.
    pub(crate) fn step(
        &mut self,
        category: Category,
        token: &str,
    ) -> Result<Option<Operation>, CalcError> {
        debug!(target: "rpn::machine", token, depth = self.stack.len(), "apply");

        match category {
            Category::Number(n) => {
                match self.mode {
                    Mode::Interactive => self.pending.push_str(token),
                    Mode::SingleShot => {
                        self.save_undo();
                        self.stack.push(n);
                    }
                }
                Ok(None)
            }
            Category::Unrecognized => match self.mode {
                Mode::Interactive => {
                    self.pending.push_str(token);
                    Ok(None)
                }
                Mode::SingleShot => Err(invalid_token(token)),
            },
            Category::Binary(op) => self.apply_binary(op).map(Some),
            Category::Unary(op) => self.apply_unary(op).map(Some),
            Category::Constant(c) => {
                // pending input is left alone
                self.save_undo();
                self.stack.push(c.value());
                Ok(None)
            }
            Category::Command(cmd) => self.apply_command(cmd, token).map(|()| None),
        }
    }

    // RUST CONCEPT: One operand-resolution policy for every arity
    // A non-empty pending input is the right-most operand; the remaining
    // operands come from the top of the stack. Everything is computed before
    // anything is mutated, so a failure leaves the state untouched.
    fn resolve_operands(&self, arity: usize, op: &'static str) -> Result<Vec<Value>, CalcError> {
        let pending = self.pending_value()?;
        let from_stack = arity - usize::from(pending.is_some());

        if self.stack.len() < from_stack {
            return Err(CalcError::InsufficientOperands { op });
        }

        let mut operands: Vec<Value> = self.stack[self.stack.len() - from_stack..].to_vec();
        operands.extend(pending);
        Ok(operands)
    }

    fn apply_binary(&mut self, op: BinaryOp) -> Result<Operation, CalcError> {
        let operands = self.resolve_operands(2, op.name())?;
        let result = op.apply(operands[0], operands[1])?;
        self.commit(operands, result, op.name())
    }

    fn apply_unary(&mut self, op: UnaryOp) -> Result<Operation, CalcError> {
        let operands = self.resolve_operands(1, op.name())?;
        let result = op.apply(operands[0])?;
        self.commit(operands, result, op.name())
    }

    fn commit(
        &mut self,
        operands: Vec<Value>,
        result: Value,
        operator: &'static str,
    ) -> Result<Operation, CalcError> {
        let from_stack = operands.len() - usize::from(!self.pending.is_empty());

        self.save_undo();
        self.stack.truncate(self.stack.len() - from_stack);
        self.stack.push(result);
        self.pending.clear();

        Ok(Operation {
            operator: operator.to_string(),
            operands,
            result,
        })
    }

    fn apply_command(&mut self, cmd: StackCommand, token: &str) -> Result<(), CalcError> {
        match cmd {
            StackCommand::Clear => {
                if !self.stack.is_empty() {
                    self.save_undo();
                }
                self.stack.clear();
                self.pending.clear();
                self.last_error = None;
                Ok(())
            }
            StackCommand::Swap => {
                let len = self.stack.len();
                if len < 2 {
                    return Err(CalcError::InsufficientOperands { op: "swap" });
                }
                self.save_undo();
                self.stack.swap(len - 1, len - 2);
                Ok(())
            }
            StackCommand::Undo => {
                let previous = self.undo_log.pop().ok_or(CalcError::NothingToUndo)?;
                self.stack = previous;
                Ok(())
            }
            StackCommand::ToggleSign => {
                if !self.pending.is_empty() {
                    // text-level toggle, "0" becomes "-0"
                    if self.pending.starts_with('-') {
                        self.pending.remove(0);
                    } else {
                        self.pending.insert(0, '-');
                    }
                    Ok(())
                } else if let Some(&top) = self.stack.last() {
                    self.save_undo();
                    if let Some(slot) = self.stack.last_mut() {
                        *slot = -top;
                    }
                    Ok(())
                } else {
                    Err(CalcError::NoValueToToggle)
                }
            }
            // Backspace and Enter edit the pending input, which only exists
            // in interactive sessions
            StackCommand::Backspace | StackCommand::Enter if self.mode == Mode::SingleShot => {
                Err(invalid_token(token))
            }
            StackCommand::Backspace => {
                self.pending.pop();
                Ok(())
            }
            StackCommand::Enter => {
                if let Some(n) = self.pending_value()? {
                    self.save_undo();
                    self.stack.push(n);
                    self.pending.clear();
                }
                Ok(())
            }
        }
    }

    // Ok(None) when nothing is pending, InvalidNumber when it does not parse
    fn pending_value(&self) -> Result<Option<Value>, CalcError> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        parse_number(&self.pending)
            .map(Some)
            .ok_or_else(|| CalcError::InvalidNumber(self.pending.clone()))
    }

    // Snapshot the stack before a mutation commits
    fn save_undo(&mut self) {
        self.undo_log.push(self.stack.clone());
    }

    fn publish(&mut self, record: CalculationRecord) {
        if let Some(sink) = self.sink.as_mut()
            && let Err(err) = sink.notify(&record)
        {
            warn!(target: "rpn::machine", error = %err, expression = %record.expression, "failed to hand off calculation record");
        }
        self.records.push(record);
    }
}

fn invalid_token(token: &str) -> CalcError {
    CalcError::InvalidToken {
        token: token.to_string(),
        column: 0,
    }
}

// Formats the stack the way the REPL prints it: "[3, 4]"
pub fn format_stack(stack: &[Value]) -> String {
    let items: Vec<String> = stack.iter().map(|n| Display(*n).to_string()).collect();
    format!("[{}]", items.join(", "))
}
