#[cfg(not(unix))]
compile_error!("tern only supports unix-like systems");

mod parser;
mod engine;
mod builtins;
mod config;
mod error;
mod signals;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use engine::ShellState;

fn init_logging() {
    let filter = EnvFilter::try_from_env("TERN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Handle one non-empty input line.
fn run_line(input: &str, state: &mut ShellState) -> engine::ExecutionResult {
    if builtins::history::is_history_request(input) {
        if let Err(e) = builtins::history::run(&state.history, &mut std::io::stdout()) {
            eprintln!("tern: history: {}", e);
        }
        state.history.record(input);
        return engine::ExecutionResult::KeepRunning;
    }
    state.history.record(input);

    match parser::parse(input) {
        Ok(line) if line.is_empty() => engine::ExecutionResult::KeepRunning,
        Ok(line) => {
            debug!("parsed {:?}", line);
            let result = engine::evaluate(&line, state);
            debug!("last status {}", state.last_status);
            result
        }
        Err(e) => {
            eprintln!("tern: {}", e);
            engine::ExecutionResult::KeepRunning
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("{}; using defaults", e);
        Config::default()
    });

    signals::init(&config.prompt).context("cannot install signal handlers")?;
    let mut rl = DefaultEditor::new().context("cannot initialise line editor")?;
    let mut state = ShellState::new(&config);

    loop {
        let readline = rl.readline(&config.prompt);
        match readline {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);

                match run_line(input, &mut state) {
                    engine::ExecutionResult::Exit => break,
                    engine::ExecutionResult::KeepRunning => {},
                }
            },
            Err(ReadlineError::Interrupted) => {
                continue;
            },
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            },
            Err(err) => {
                eprintln!("tern: {}", err);
                break;
            }
        }
    }
    Ok(())
}
