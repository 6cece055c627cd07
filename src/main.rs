use std::path::PathBuf;
use std::{env, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use rlox::{Lox, RunOutcome};

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))).init();

    let args: Vec<String> = env::args().collect();

    let outcome = match args.len() {
        n if n > 2 => {
            eprintln!("Usage: rlox [script]");
            process::exit(64);
        }
        2 => run_file(&args[1]),
        _ => run_prompt(),
    };

    process::exit(match outcome {
        RunOutcome::Ok => 0,
        RunOutcome::StaticError => 65,
        RunOutcome::RuntimeError => 70,
    });
}

fn run_file(path: &str) -> RunOutcome {
    let mut lox = Lox::new();
    match lox.run_file(&PathBuf::from(path)) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("Could not read file '{path}': {err}");
            process::exit(74);
        }
    }
}

/// A language error on one REPL line must not end the session with a
/// non-zero exit code. Only quitting (EOF/interrupt) or a readline
/// failure does, so the loop's own exit code is always `Ok` regardless
/// of what individual lines report.
fn run_prompt() -> RunOutcome {
    let mut lox = Lox::new();
    let mut editor = DefaultEditor::new().expect("terminal supports line editing");
    let history_path = history_path();

    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let _ = lox.run(&line, true);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Readline error: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }

    RunOutcome::Ok
}

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".rlox_history"))
}
