// One-shot subcommands: eval, batch, ops, history

use crate::config::Config;
use crate::display::{
    render_batch_result, render_capabilities, render_evaluation, render_history_entry,
    render_summary,
};
use crate::history_store::JsonlHistory;
use rpn_core::history::HistoryStore;
use rpn_core::{
    BatchResult, BatchSummary, CalculationRecord, Evaluation, batch_lines, evaluate_traced,
    run_batch, run_batch_parallel, supported_operations,
};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Exit status when `--strict` is given and at least one batch line failed.
pub const EXIT_LINE_FAILED: u8 = 2;

pub fn eval(config: &Config, expression: &str, trace: bool, json: bool) -> CliResult<ExitCode> {
    match evaluate_traced(expression) {
        Ok(evaluation) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                println!("{}", render_evaluation(&evaluation, trace));
            }
            if config.persist {
                save_evaluations(config, std::slice::from_ref(&evaluation));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if json {
                let failure = serde_json::json!({
                    "expression": expression,
                    "error": e.to_string(),
                    "kind": e.kind(),
                });
                println!("{}", serde_json::to_string_pretty(&failure)?);
            } else {
                eprintln!("Error: {}", e);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub json: bool,
    pub jobs: usize,
    pub strict: bool,
    pub save: bool,
}

#[derive(Serialize)]
struct BatchReport<'a> {
    results: &'a [BatchResult],
    summary: BatchSummary,
}

/// Evaluate every line of `source` (`-` reads stdin).
pub fn batch(config: &Config, source: &Path, options: BatchOptions) -> CliResult<ExitCode> {
    let text = if source.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| format!("cannot read '{}': {}", source.display(), e))?
    };

    let lines = batch_lines(&text);
    info!(target: "rpn::cli", source = %source.display(), lines = lines.len(), jobs = options.jobs, "running batch");

    let saving = options.save && config.persist;
    let (results, evaluations) = if saving {
        // one traced pass gives both the results and the operations to store
        run_batch_traced(&lines)
    } else if options.jobs > 1 {
        (run_batch_parallel(&lines, options.jobs), Vec::new())
    } else {
        (run_batch(&lines), Vec::new())
    };
    let summary = BatchSummary::from_results(&results);

    if options.json {
        let report = BatchReport {
            results: &results,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for result in &results {
            println!("{}", render_batch_result(result));
        }
        println!("{}", render_summary(&summary));
    }

    if saving {
        save_evaluations(config, &evaluations);
    }

    if options.strict && summary.failed > 0 {
        Ok(ExitCode::from(EXIT_LINE_FAILED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

// Sequential; returns every line's result plus the evaluations of the lines that succeeded
fn run_batch_traced(lines: &[&str]) -> (Vec<BatchResult>, Vec<Evaluation>) {
    let mut results = Vec::with_capacity(lines.len());
    let mut evaluations = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let outcome = match evaluate_traced(line) {
            Ok(evaluation) => {
                let result = evaluation.result;
                evaluations.push(evaluation);
                Ok(result)
            }
            Err(e) => Err(e),
        };
        results.push(BatchResult {
            line: index + 1,
            expression: line.to_string(),
            outcome,
        });
    }
    (results, evaluations)
}

pub fn ops(json: bool) -> CliResult<ExitCode> {
    let caps = supported_operations();
    if json {
        println!("{}", serde_json::to_string_pretty(&caps)?);
    } else {
        println!("{}", render_capabilities(&caps));
    }
    Ok(ExitCode::SUCCESS)
}

/// Saved calculations, newest first; only `user`'s (or the configured user's) when one is set.
pub fn history(
    config: &Config,
    limit: Option<usize>,
    user: Option<&str>,
    json: bool,
) -> CliResult<ExitCode> {
    let store = JsonlHistory::open(&config.history_file)?;
    let limit = limit.unwrap_or(config.history_limit);
    let entries = match user.or(config.user.as_deref()) {
        Some(user) => store.recent_for_user(user, limit)?,
        None => store.recent(limit)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No history in {}", store.path().display());
    } else {
        for entry in &entries {
            println!("{}", render_history_entry(entry));
        }
    }
    Ok(ExitCode::SUCCESS)
}

// History is best-effort: a failure is logged and the command still succeeds
fn save_evaluations(config: &Config, evaluations: &[Evaluation]) {
    let mut store = match JsonlHistory::open(&config.history_file) {
        Ok(store) => store.with_user(config.user.clone()),
        Err(e) => {
            warn!(target: "rpn::cli", error = %e, path = %config.history_file.display(), "history not saved");
            return;
        }
    };

    for evaluation in evaluations {
        let record = CalculationRecord {
            expression: evaluation.expression.clone(),
            result: evaluation.result,
        };
        if let Err(e) = store.save(&record, Some(evaluation.operations.clone())) {
            warn!(target: "rpn::cli", error = %e, expression = %record.expression, "history not saved");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with_history(name: &str) -> Config {
        let history_file: PathBuf = std::env::temp_dir().join(format!(
            "rpn-commands-{}-{}.jsonl",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&history_file);
        Config {
            history_file,
            ..Config::default()
        }
    }

    fn write_batch(name: &str, text: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rpn-batch-{}-{}.csv", name, std::process::id()));
        std::fs::write(&path, text).unwrap();
        path
    }

    fn options(strict: bool, save: bool) -> BatchOptions {
        BatchOptions {
            json: false,
            jobs: 1,
            strict,
            save,
        }
    }

    #[test]
    fn test_eval_saves_to_history() {
        let config = config_with_history("eval");
        assert_eq!(eval(&config, "3 4 +", false, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(eval(&config, "8 0 /", false, false).unwrap(), ExitCode::FAILURE);

        let entries = JsonlHistory::open(&config.history_file).unwrap().recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].expression, "3 4 +");
        assert_eq!(entries[0].operations.as_ref().map(Vec::len), Some(1));

        std::fs::remove_file(&config.history_file).unwrap();
    }

    #[test]
    fn test_eval_without_persist_writes_nothing() {
        let config = Config {
            persist: false,
            ..config_with_history("no-persist")
        };
        eval(&config, "3 4 +", false, false).unwrap();
        assert!(!config.history_file.exists());
    }

    #[test]
    fn test_batch_exit_codes() {
        let config = Config {
            persist: false,
            ..config_with_history("exit")
        };
        let file = write_batch("exit", "3 4 +\nbad token\n9 sqrt\n");

        assert_eq!(batch(&config, &file, options(false, false)).unwrap(), ExitCode::SUCCESS);
        assert_eq!(
            batch(&config, &file, options(true, false)).unwrap(),
            ExitCode::from(EXIT_LINE_FAILED)
        );

        std::fs::remove_file(&file).unwrap();
    }

    #[test]
    fn test_batch_save_stores_successful_lines() {
        let config = config_with_history("batch-save");
        let file = write_batch("save", "expression\n3 4 +,x\n8 0 /\n9 sqrt\n");

        batch(&config, &file, options(false, true)).unwrap();

        let entries = JsonlHistory::open(&config.history_file).unwrap().recent(10).unwrap();
        let expressions: Vec<&str> = entries.iter().map(|e| e.expression.as_str()).collect();
        assert_eq!(expressions, ["9 sqrt", "3 4 +"]);

        std::fs::remove_file(&file).unwrap();
        std::fs::remove_file(&config.history_file).unwrap();
    }

    #[test]
    fn test_traced_batch_matches_plain_batch() {
        let lines = ["3 4 +", "bad token", "", "9 sqrt 2 pow"];
        let (results, evaluations) = run_batch_traced(&lines);
        assert_eq!(results, run_batch(lines));

        let stored: Vec<&str> = evaluations.iter().map(|e| e.expression.as_str()).collect();
        assert_eq!(stored, ["3 4 +", "9 sqrt 2 pow"]);
        assert_eq!(evaluations[1].operations.len(), 2);
    }

    #[test]
    fn test_history_filters_by_user() {
        let config = Config {
            user: Some("alice".to_string()),
            ..config_with_history("user")
        };
        eval(&config, "1 1 +", false, false).unwrap();
        let bob = Config {
            user: Some("bob".to_string()),
            ..config.clone()
        };
        eval(&bob, "2 2 +", false, false).unwrap();

        let store = JsonlHistory::open(&config.history_file).unwrap();
        let alice_entries = store.recent_for_user("alice", 10).unwrap();
        assert_eq!(alice_entries.len(), 1);
        assert_eq!(alice_entries[0].expression, "1 1 +");
        assert_eq!(history(&config, None, Some("bob"), true).unwrap(), ExitCode::SUCCESS);

        std::fs::remove_file(&config.history_file).unwrap();
    }

    #[test]
    fn test_batch_missing_file_is_an_error() {
        let config = config_with_history("missing");
        let missing = std::env::temp_dir().join("rpn-batch-does-not-exist.csv");
        assert!(batch(&config, &missing, options(false, false)).is_err());
    }

    #[test]
    fn test_history_of_empty_file() {
        let config = config_with_history("empty");
        assert_eq!(history(&config, Some(5), None, false).unwrap(), ExitCode::SUCCESS);
    }
}
