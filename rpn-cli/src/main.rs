//! RPN CLI - interactive calculator, one-shot evaluation and batch runner
//!
//! This is a thin wrapper around rpn-core: the REPL drives an interactive
//! `StackMachine`, `eval` and `batch` go through the single-shot evaluator.

mod commands;
mod config;
mod display;
mod history_store;
mod logging;
mod repl;

use clap::{Parser, Subcommand};
use commands::BatchOptions;
use config::Config;
use logging::LogFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "rpn", version, about = "RPN stack calculator", long_about = None)]
struct Cli {
    /// JSON config file (defaults to ./rpn.json when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Do not read or write the history file
    #[arg(long, global = true)]
    no_history: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive calculator (the default)
    Repl,

    /// Evaluate one RPN expression, e.g. `rpn eval 3 4 +`
    Eval {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
        expression: Vec<String>,

        /// Print every operation applied
        #[arg(long)]
        trace: bool,

        #[arg(long)]
        json: bool,
    },

    /// Evaluate one expression per line of FILE (`-` for stdin)
    Batch {
        file: PathBuf,

        #[arg(long)]
        json: bool,

        /// Worker threads
        #[arg(long, short = 'j', default_value_t = 1)]
        jobs: usize,

        /// Exit with status 2 if any line fails
        #[arg(long)]
        strict: bool,

        /// Store successful lines in the history file
        #[arg(long)]
        save: bool,
    },

    /// List supported operators, functions and constants
    Ops {
        #[arg(long)]
        json: bool,
    },

    /// Show saved calculations, newest first
    History {
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Only entries saved by USER (defaults to the configured user)
        #[arg(long, value_name = "USER")]
        user: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    // defaults < config file < environment < flags
    fn resolve_config(&self) -> Result<Config, config::ConfigError> {
        let mut config = Config::load(self.config.as_deref())?;
        config.apply_env(|name| std::env::var(name).ok());
        self.apply_flags(&mut config);
        Ok(config)
    }

    fn apply_flags(&self, config: &mut Config) {
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if self.no_history {
            config.persist = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    logging::init(&config.log_config()?, config.log_format);
    debug!(target: "rpn::cli", ?config, "configuration resolved");

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            repl::run_repl(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Eval {
            expression,
            trace,
            json,
        } => commands::eval(&config, &expression.join(" "), trace, json),
        Command::Batch {
            file,
            json,
            jobs,
            strict,
            save,
        } => commands::batch(
            &config,
            &file,
            BatchOptions {
                json,
                jobs,
                strict,
                save,
            },
        ),
        Command::Ops { json } => commands::ops(json),
        Command::History { limit, user, json } => {
            commands::history(&config, limit, user.as_deref(), json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_eval_accepts_negative_numbers() {
        let cli = Cli::try_parse_from(["rpn", "eval", "-1", "sqrt"]).unwrap();
        match cli.command {
            Some(Command::Eval { expression, .. }) => assert_eq!(expression, ["-1", "sqrt"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "rpn",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--no-history",
            "ops",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply_flags(&mut config);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.persist);

        let cli = Cli::try_parse_from(["rpn", "ops"]).unwrap();
        let mut untouched = Config::default();
        cli.apply_flags(&mut untouched);
        assert_eq!(untouched, Config::default());
    }

    #[test]
    fn test_repl_is_default() {
        let cli = Cli::try_parse_from(["rpn"]).unwrap();
        assert!(cli.command.is_none());
    }
}
