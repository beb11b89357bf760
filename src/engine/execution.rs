use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::debug;

use crate::builtins;
use crate::error::ExecError;
use crate::parser::{ParsedCommand, Pipeline};
use crate::signals::{self, InterruptMask};

use super::foreground::ForegroundSlot;
use super::redirect::{open_stdin_redirect, open_stdout_redirect};
use super::state::{ExecutionResult, ShellState};

/// Status reported for a child killed by a signal.
const SIGNALED_STATUS: i32 = 1;
/// Status reported when a program could not be started.
const SPAWN_FAILED_STATUS: i32 = 1;

/// How one external command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Exited(i32),
    /// Terminated by the given signal number.
    Signaled(i32),
    /// The program image never started; the error was already reported.
    SpawnFailed,
}

impl Outcome {
    pub fn status(self) -> i32 {
        match self {
            Outcome::Exited(code) => code,
            Outcome::Signaled(sig) => {
                debug!("child terminated by signal {}", sig);
                SIGNALED_STATUS
            }
            Outcome::SpawnFailed => SPAWN_FAILED_STATUS,
        }
    }
}

impl From<ExitStatus> for Outcome {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => Outcome::Exited(code),
            (None, Some(sig)) => Outcome::Signaled(sig),
            (None, None) => Outcome::Exited(SIGNALED_STATUS),
        }
    }
}

// ── Single command (no pipe) ──────────────────────────────────────────────

/// Execute one simple command with optional redirections.
/// Returns `(ExecutionResult, exit_code)`.
///
/// Built-ins run inside the interpreter and are never forked.
pub fn run(cmd: &ParsedCommand, state: &mut ShellState) -> (ExecutionResult, i32) {
    if let Some(info) = builtins::find_command(cmd.name()) {
        if cmd.stdin.is_some() || cmd.stdout.is_some() {
            debug!("ignoring redirections on builtin '{}'", cmd.name());
        }
        return (info.run)(cmd.args(), state);
    }

    let outcome = match prepare(cmd, None, None).and_then(|command| spawn(command, cmd.name(), state.foreground)) {
        Ok(mut child) => wait(&mut child, state.foreground),
        Err(e) => {
            eprintln!("tern: {}", e);
            Outcome::SpawnFailed
        }
    };
    debug!("{} finished: {:?}", cmd.name(), outcome);
    (ExecutionResult::KeepRunning, outcome.status())
}

// ── Pipeline execution ────────────────────────────────────────────────────

enum Stage {
    Running(Child),
    Finished(Outcome),
}

/// Execute a pipeline of two or more commands connected by `|`.
///
/// Every stage is started left to right, each reading the previous stage's
/// stdout, then every stage is reaped in order. The result is the status of
/// the last stage; earlier failures are not surfaced, as in POSIX sh.
pub fn run_pipeline(pipeline: &Pipeline, state: &ShellState) -> i32 {
    let cmds = &pipeline.commands;
    let last_idx = cmds.len() - 1;
    let mut stages: Vec<Stage> = Vec::with_capacity(cmds.len());
    let mut upstream: Option<Stdio> = None;

    for (i, cmd) in cmds.iter().enumerate() {
        // A stage whose upstream produced no pipe reads end-of-input.
        let stdin = if i == 0 { None } else { Some(upstream.take().unwrap_or_else(Stdio::null)) };
        let stdout = if i == last_idx { None } else { Some(Stdio::piped()) };

        if let Some(info) = builtins::find_command(cmd.name()) {
            stages.push(Stage::Finished(Outcome::Exited((info.detached)(cmd.args(), state))));
            continue;
        }

        match prepare(cmd, stdin, stdout).and_then(|command| spawn(command, cmd.name(), state.foreground)) {
            Ok(mut child) => {
                upstream = child.stdout.take().map(Stdio::from);
                stages.push(Stage::Running(child));
            }
            Err(e) if e.is_fatal() => {
                eprintln!("tern: {}", e);
                abandon(stages, state.foreground);
                return SPAWN_FAILED_STATUS;
            }
            Err(e) => {
                eprintln!("tern: {}", e);
                stages.push(Stage::Finished(Outcome::SpawnFailed));
            }
        }
    }

    let mut last = Outcome::Exited(0);
    for stage in stages {
        last = match stage {
            Stage::Running(mut child) => wait(&mut child, state.foreground),
            Stage::Finished(outcome) => outcome,
        };
    }
    debug!("pipeline finished: {:?}", last);
    last.status()
}

// ── Process plumbing ──────────────────────────────────────────────────────

/// Build the `Command` for one stage. `stdin`/`stdout` are the pipe ends for
/// this stage; `None` inherits the interpreter's own stream. A file
/// redirection on the command overrides the pipe end, which is then dropped.
fn prepare(cmd: &ParsedCommand, stdin: Option<Stdio>, stdout: Option<Stdio>) -> Result<Command, ExecError> {
    let mut command = Command::new(cmd.name());
    command.args(cmd.args());

    if let Some(path) = &cmd.stdin {
        command.stdin(Stdio::from(open_stdin_redirect(path)?));
    } else if let Some(pipe) = stdin {
        command.stdin(pipe);
    }

    if let Some(redir) = &cmd.stdout {
        command.stdout(Stdio::from(open_stdout_redirect(redir)?));
    } else if let Some(pipe) = stdout {
        command.stdout(pipe);
    }

    unsafe {
        command.pre_exec(signals::restore_default);
    }
    Ok(command)
}

/// Start `command` and publish the child as the foreground process.
///
/// `command` is consumed, so the interpreter's copies of any redirection
/// files and pipe ends are closed as soon as this returns, on both paths.
fn spawn(mut command: Command, program: &str, slot: &ForegroundSlot) -> Result<Child, ExecError> {
    let _mask = InterruptMask::block();
    let child = command.spawn().map_err(|e| ExecError::from_spawn(program, e))?;
    slot.set(child.id());
    debug!("spawned {} as pid {}", program, child.id());
    Ok(child)
}

/// Block until `child` exits, keeping it in the foreground slot meanwhile.
fn wait(child: &mut Child, slot: &ForegroundSlot) -> Outcome {
    slot.set(child.id());
    let result = child.wait();
    slot.clear();
    match result {
        Ok(status) => Outcome::from(status),
        Err(e) => {
            eprintln!("tern: wait: {}", e);
            Outcome::Exited(SPAWN_FAILED_STATUS)
        }
    }
}

/// Kill and reap stages that were already started.
fn abandon(stages: Vec<Stage>, slot: &ForegroundSlot) {
    for stage in stages {
        if let Stage::Running(mut child) = stage {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
    slot.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{self, CommandLine};
    use nix::sys::signal::{kill, Signal};
    use std::path::Path;
    use std::time::{Duration, Instant};

    fn state() -> ShellState {
        ShellState::with_foreground(Box::leak(Box::new(ForegroundSlot::new())))
    }

    fn only_pipeline(line: &str) -> Pipeline {
        let CommandLine { mut items } = parser::parse(line).unwrap();
        items.remove(0).pipelines.remove(0)
    }

    fn status_of(line: &str, state: &mut ShellState) -> i32 {
        let pipeline = only_pipeline(line);
        if pipeline.commands.len() == 1 {
            run(&pipeline.commands[0], state).1
        } else {
            run_pipeline(&pipeline, state)
        }
    }

    fn sh(dir: &Path, line: &str) -> String {
        line.replace("$DIR", &dir.display().to_string())
    }

    #[test]
    fn test_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state();
        std::fs::write(dir.path().join("seven.sh"), "exit 7\n").unwrap();

        assert_eq!(status_of("true", &mut state), 0);
        assert_eq!(status_of("false", &mut state), 1);
        assert_eq!(status_of(&sh(dir.path(), "sh $DIR/seven.sh"), &mut state), 7);
    }

    #[test]
    fn test_missing_program_is_spawn_failure() {
        let mut state = state();
        assert_eq!(status_of("tern-no-such-program-xyz", &mut state), 1);
        assert_eq!(state.foreground.current(), None);
    }

    #[test]
    fn test_signal_death_maps_to_one() {
        assert_eq!(Outcome::from(ExitStatus::from_raw(9)), Outcome::Signaled(9));
        assert_eq!(Outcome::Signaled(9).status(), 1);
        assert_eq!(Outcome::from(ExitStatus::from_raw(3 << 8)), Outcome::Exited(3));
    }

    #[test]
    fn test_output_redirect_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state();
        let out = dir.path().join("f.txt");

        assert_eq!(status_of(&sh(dir.path(), "echo hello > $DIR/f.txt"), &mut state), 0);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello\n");

        status_of(&sh(dir.path(), "echo world >> $DIR/f.txt"), &mut state);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello\nworld\n");

        status_of(&sh(dir.path(), "echo again > $DIR/f.txt"), &mut state);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "again\n");
    }

    #[test]
    fn test_input_redirect() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state();
        std::fs::write(dir.path().join("in.txt"), "line1\nline2\n").unwrap();

        let line = sh(dir.path(), "cat < $DIR/in.txt > $DIR/out.txt");
        assert_eq!(status_of(&line, &mut state), 0);
        assert_eq!(std::fs::read_to_string(dir.path().join("out.txt")).unwrap(), "line1\nline2\n");
    }

    #[test]
    fn test_unopenable_redirect_fails_without_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state();
        let line = sh(dir.path(), "cat < $DIR/absent > $DIR/out.txt");
        assert_eq!(status_of(&line, &mut state), 1);
        assert!(!dir.path().join("out.txt").exists());
    }

    #[test]
    fn test_pipeline_data_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state();
        let line = sh(dir.path(), "echo hello | tr a-z A-Z | cat > $DIR/out.txt");
        assert_eq!(status_of(&line, &mut state), 0);
        assert_eq!(std::fs::read_to_string(dir.path().join("out.txt")).unwrap(), "HELLO\n");
    }

    #[test]
    fn test_pipeline_status_is_last_stage() {
        let mut state = state();
        assert_eq!(status_of("false | true", &mut state), 0);
        assert_eq!(status_of("true | false", &mut state), 1);
        assert_eq!(status_of("tern-no-such-program-xyz | true", &mut state), 0);
        assert_eq!(status_of("true | tern-no-such-program-xyz", &mut state), 1);
    }

    #[test]
    fn test_pipeline_reader_sees_eof() {
        // `wc` only exits once every write end of its input pipe is closed.
        let dir = tempfile::tempdir().unwrap();
        let mut state = state();
        let line = sh(dir.path(), "printf a\\nb\\n | wc -l > $DIR/count");
        assert_eq!(status_of(&line, &mut state), 0);
        let count = std::fs::read_to_string(dir.path().join("count")).unwrap();
        assert_eq!(count.trim(), "2");
    }

    #[test]
    fn test_stage_redirect_overrides_pipe() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state();
        let line = sh(dir.path(), "echo first > $DIR/a | cat > $DIR/b");
        assert_eq!(status_of(&line, &mut state), 0);
        assert_eq!(std::fs::read_to_string(dir.path().join("a")).unwrap(), "first\n");
        assert_eq!(std::fs::read_to_string(dir.path().join("b")).unwrap(), "");
    }

    #[test]
    fn test_builtin_in_pipeline_is_detached() {
        let mut state = state();
        let before = std::env::current_dir().unwrap();
        assert_eq!(status_of("cd / | true", &mut state), 0);
        assert_eq!(status_of("true | cd /tern-no-such-dir", &mut state), 1);
        assert_eq!(status_of("true | exit", &mut state), 0);
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_interrupt_reaches_foreground_child() {
        let slot: &'static ForegroundSlot = Box::leak(Box::new(ForegroundSlot::new()));
        let mut state = ShellState::with_foreground(slot);

        let sender = std::thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(5);
            while Instant::now() < deadline {
                if let Some(pid) = slot.current() {
                    kill(pid, Signal::SIGINT).unwrap();
                    return true;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            false
        });

        let started = Instant::now();
        assert_eq!(status_of("sleep 10", &mut state), 1);
        assert!(started.elapsed() < Duration::from_secs(8));
        assert!(sender.join().unwrap());
        assert_eq!(slot.current(), None);
    }
}
