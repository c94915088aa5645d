//! # RPN Core
//!
//! Evaluator library for a Reverse Polish Notation calculator.
//!
//! The same stack machine drives two modes:
//!
//! - **Interactive**: one token at a time, numbers typed into a pending
//!   input, undo over the operand stack, a record for every completed
//!   calculation
//! - **Batch**: each line is a complete expression evaluated on its own
//!   fresh machine, with failures isolated per line
//!
//! Works in `no_std + alloc` environments; float math then comes from
//! `num-traits` with `libm`.
//!
//! ## Example
//!
//! ```
//! use rpn_core::{evaluate, run_batch, StackMachine};
//!
//! assert_eq!(evaluate("5 6 + 2 *"), Ok(22.0));
//!
//! let mut machine = StackMachine::new();
//! for token in ["3", "enter", "4", "+"] {
//!     machine.apply_token(token).unwrap();
//! }
//! assert_eq!(machine.stack(), &[7.0]);
//!
//! let results = run_batch(["3 4 +", "bad token", "9 sqrt"]);
//! assert!(results[1].outcome.is_err());
//! ```

#![cfg_attr(target_os = "none", no_std)]

#[cfg(target_os = "none")]
extern crate alloc;

// Public modules
pub mod value;
pub mod error;
pub mod tokenizer;
pub mod primitives;
pub mod builtins;
pub mod classify;
pub mod record;
pub mod machine;
pub mod evaluator;
pub mod batch;
#[cfg(not(target_os = "none"))]
pub mod history;

// Internal module
mod compat;

// Re-exports for convenience
pub use batch::{batch_iter, batch_lines, run_batch, BatchResult, BatchSummary};
#[cfg(feature = "std")]
pub use batch::run_batch_parallel;
pub use builtins::{supported_operations, Capabilities, StackCommand};
pub use classify::{classify, Category};
pub use error::CalcError;
pub use evaluator::{evaluate, evaluate_traced, Evaluation};
pub use machine::{DisplaySnapshot, Mode, StackMachine};
pub use record::{CalculationRecord, Operation, RecordSink, SinkError};
pub use value::Value;
