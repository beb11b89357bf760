use std::env;
use std::path::PathBuf;

use crate::engine::{ExecutionResult, ShellState};
use crate::builtins::registry::CommandInfo;
use crate::error::BuiltinError;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "cd",
    run: cd_runner,
    detached: cd_detached,
};

pub fn cd_runner(args: &[String], state: &mut ShellState) -> (ExecutionResult, i32) {
    match run(args, state) {
        Ok(()) => (ExecutionResult::KeepRunning, 0),
        Err(e) => {
            eprintln!("tern: cd: {}", e);
            (ExecutionResult::KeepRunning, 1)
        }
    }
}

/// Change the interpreter's working directory. On failure the directory is
/// left untouched.
pub fn run(args: &[String], state: &mut ShellState) -> Result<(), BuiltinError> {
    let target = resolve_target(args, state)?;
    let current = env::current_dir().ok();

    env::set_current_dir(&target).map_err(|source| BuiltinError::Chdir { path: target, source })?;

    state.previous_dir = current;
    Ok(())
}

/// `cd` as a pipeline stage: report whether the change would succeed.
pub fn cd_detached(args: &[String], state: &ShellState) -> i32 {
    let checked = resolve_target(args, state).and_then(|target| match target.metadata() {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(BuiltinError::NotADirectory { path: target }),
        Err(source) => Err(BuiltinError::Chdir { path: target, source }),
    });
    match checked {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("tern: cd: {}", e);
            1
        }
    }
}

fn resolve_target(args: &[String], state: &ShellState) -> Result<PathBuf, BuiltinError> {
    match args {
        [] => dirs::home_dir().ok_or(BuiltinError::NoHome),
        [dash] if dash == "-" => state.previous_dir.clone().ok_or(BuiltinError::NoPreviousDir),
        [path] => Ok(PathBuf::from(path)),
        _ => Err(BuiltinError::TooManyArgs),
    }
}
