use tracing::debug;

use crate::engine::{ExecutionResult, ShellState};
use crate::builtins::registry::CommandInfo;

pub const COMMAND_INFO_EXIT: CommandInfo = CommandInfo {
    name: "exit",
    run: exit_runner,
    detached: exit_detached,
};

/// Leave the interpreter with status 0. Arguments are ignored.
pub fn exit_runner(args: &[String], _state: &mut ShellState) -> (ExecutionResult, i32) {
    if !args.is_empty() {
        debug!("exit: ignoring arguments {:?}", args);
    }
    (ExecutionResult::Exit, 0)
}

/// Inside a pipeline `exit` only ends its own stage.
pub fn exit_detached(_args: &[String], _state: &ShellState) -> i32 {
    0
}
