use tracing::debug;

use crate::parser::{CommandLine, Pipeline};

use super::execution::{run, run_pipeline};
use super::state::{ExecutionResult, ShellState};

/// Execute one pipeline, routing single commands through [`run`] so that
/// built-ins can act on the interpreter itself.
fn execute(pipeline: &Pipeline, state: &mut ShellState) -> (ExecutionResult, i32) {
    if pipeline.commands.len() == 1 {
        run(&pipeline.commands[0], state)
    } else {
        (ExecutionResult::KeepRunning, run_pipeline(pipeline, state))
    }
}

// ── Command list (;, &&) ──────────────────────────────────────────────────

/// Execute a parsed line.
///
/// - **`;`**  - every sequence item runs, whatever the previous one returned.
/// - **`&&`** - within an item, a pipeline runs only if the previous one
///              exited 0; once one fails the rest of that item is skipped.
///
/// `state.last_status` is left holding the status of the last pipeline that
/// actually ran.
pub fn evaluate(line: &CommandLine, state: &mut ShellState) -> ExecutionResult {
    for item in &line.items {
        let mut proceed = true;
        for pipeline in &item.pipelines {
            if !proceed {
                debug!("skipping {:?}", pipeline.commands[0].name());
                continue;
            }

            let (result, code) = execute(pipeline, state);
            if let ExecutionResult::Exit = result {
                return ExecutionResult::Exit;
            }
            state.last_status = code;
            proceed = code == 0;
        }
    }

    ExecutionResult::KeepRunning
}
