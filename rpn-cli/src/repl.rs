// Async REPL implementation using editline with tokio spawn_blocking
//
// Every whitespace-separated token on a line is a keypress on the
// calculator: digits build the pending number, `enter` (or an empty line)
// pushes it, operators consume it. The first failing token stops the rest
// of the line; the display always reflects the state after the last token
// that succeeded.

use crate::config::Config;
use crate::display::{render_capabilities, render_snapshot};
use crate::history_store::{JsonlHistory, spawn_writer};
use editline::{LineEditor, terminals::StdioTerminal};
use rpn_core::builtins::{lookup, words};
use rpn_core::machine::format_stack;
use rpn_core::tokenizer::tokenize;
use rpn_core::{StackMachine, supported_operations};
use std::io::Write;
use tracing::{info, warn};

enum Meta {
    Quit,
    Handled,
    NotMeta,
}

pub async fn run_repl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    print_banner();

    let mut machine = StackMachine::new();

    let writer = if config.persist {
        match JsonlHistory::open(&config.history_file) {
            Ok(store) => {
                let (sink, handle) = spawn_writer(store.with_user(config.user.clone()));
                machine.set_record_sink(Box::new(sink));
                Some(handle)
            }
            Err(e) => {
                warn!(target: "rpn::cli", error = %e, path = %config.history_file.display(), "history disabled");
                None
            }
        }
    } else {
        None
    };

    let mut editor = LineEditor::new(1024, 50);
    let mut terminal = StdioTerminal::new();

    print!("{}", render_snapshot(&machine.snapshot()));

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        // editline blocks on the terminal; hand both to a blocking task and take them back
        let (ed, term, read_result) = tokio::task::spawn_blocking(move || {
            let result = editor.read_line(&mut terminal);
            (editor, terminal, result)
        })
        .await?;
        editor = ed;
        terminal = term;

        match read_result {
            Ok(line) => {
                match meta_command(line.trim(), &machine) {
                    Meta::Quit => {
                        println!("Goodbye!");
                        break;
                    }
                    Meta::Handled => continue,
                    Meta::NotMeta => {}
                }

                process_line(&line, &mut machine);
                print!("{}", render_snapshot(&machine.snapshot()));
            }
            Err(editline::Error::Eof) => {
                // EOF (Ctrl-D)
                println!("\nGoodbye!");
                break;
            }
            Err(editline::Error::Interrupted) => {
                // Ctrl-C - just continue
                println!("^C");
                continue;
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    info!(target: "rpn::cli", calculations = machine.records().len(), "session ended");

    // dropping the machine drops its sink, which lets the writer drain and stop
    drop(machine);
    if let Some(handle) = writer {
        handle.await?;
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!(" ____  ____  _   _ ");
    println!("|  _ \\|  _ \\| \\ | |");
    println!("| |_) | |_) |  \\| |");
    println!("|  _ <|  __/| |\\  |");
    println!("|_| \\_\\_|   |_| \\_| v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Type `quit` or press Ctrl-D to exit");
    println!("Type numbers and operators separated by spaces; an empty line is `enter`");
    println!("Type `words` to see every operator and command");
    println!("Type `help <word>` to get help for a word");
    println!("Type `history` to see this session's calculations");
    println!();
}

fn meta_command(line: &str, machine: &StackMachine) -> Meta {
    let mut parts = line.split_whitespace();
    let (Some(first), rest) = (parts.next(), parts.next()) else {
        return Meta::NotMeta;
    };
    if parts.next().is_some() {
        return Meta::NotMeta;
    }

    match (first, rest) {
        ("quit" | "exit", None) => Meta::Quit,
        ("words", None) => {
            let names: Vec<&str> = words().map(|entry| entry.name).collect();
            println!("{}", names.join(" "));
            Meta::Handled
        }
        ("ops", None) => {
            println!("{}", render_capabilities(&supported_operations()));
            Meta::Handled
        }
        ("stack", None) => {
            println!("{}", format_stack(machine.stack()));
            Meta::Handled
        }
        ("history", None) => {
            if machine.records().is_empty() {
                println!("No calculations yet");
            }
            for (i, record) in machine.records().iter().enumerate() {
                println!("{:>4}  {}", i + 1, record.expression);
            }
            Meta::Handled
        }
        ("help", Some(word)) => {
            match lookup(word) {
                Some(entry) => println!("{}", entry.doc),
                None => println!("Unknown word: {}", word),
            }
            Meta::Handled
        }
        ("help", None) => {
            println!("Usage: help <word>   (try `words` for the list)");
            Meta::Handled
        }
        _ => Meta::NotMeta,
    }
}

// A failure is printed and left in `machine.last_error()` for the display
fn process_line(line: &str, machine: &mut StackMachine) {
    let tokens = tokenize(line);
    let texts: Vec<&str> = if tokens.is_empty() {
        vec!["enter"]
    } else {
        tokens.iter().map(|token| token.text).collect()
    };

    for text in texts {
        if let Err(e) = machine.apply_token(text) {
            eprintln!("Error: {} (at `{}`)", e, text);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_is_enter() {
        let mut machine = StackMachine::new();
        process_line("42", &mut machine);
        process_line("   ", &mut machine);
        assert_eq!(machine.stack(), &[42.0]);
        assert_eq!(machine.pending(), "");
        assert!(machine.last_error().is_none());
    }

    #[test]
    fn test_line_stops_at_first_error() {
        let mut machine = StackMachine::new();
        process_line("8 enter 0 enter", &mut machine);
        assert!(machine.last_error().is_none());

        process_line("/ 5 enter", &mut machine);
        assert_eq!(machine.last_error(), Some(&rpn_core::CalcError::DivisionByZero));
        assert_eq!(machine.stack(), &[8.0, 0.0]);
        assert_eq!(machine.pending(), "");
    }

    #[test]
    fn test_whole_calculation_on_one_line() {
        let mut machine = StackMachine::new();
        process_line("3 enter 4 + 2 *", &mut machine);
        assert!(machine.last_error().is_none());
        assert_eq!(machine.stack(), &[14.0]);
        assert_eq!(machine.records().len(), 2);
    }

    #[test]
    fn test_meta_commands() {
        let machine = StackMachine::new();
        assert!(matches!(meta_command("quit", &machine), Meta::Quit));
        assert!(matches!(meta_command("exit", &machine), Meta::Quit));
        assert!(matches!(meta_command("help sqrt", &machine), Meta::Handled));
        assert!(matches!(meta_command("stack", &machine), Meta::Handled));
        // operators and numbers fall through to the machine
        assert!(matches!(meta_command("3 4 +", &machine), Meta::NotMeta));
        assert!(matches!(meta_command("clear", &machine), Meta::NotMeta));
        assert!(matches!(meta_command("", &machine), Meta::NotMeta));
    }
}
