use crate::engine::{ExecutionResult, ShellState};
use crate::builtins;

/// Runs a builtin against the interpreter itself.
pub type BuiltinRunner = fn(&[String], &mut ShellState) -> (ExecutionResult, i32);

/// Runs a builtin as a pipeline stage. Nothing it does may outlive the
/// stage, so it only gets to look at the state and report a status.
pub type DetachedRunner = fn(&[String], &ShellState) -> i32;

pub struct CommandInfo {
    pub name: &'static str,
    pub run: BuiltinRunner,
    pub detached: DetachedRunner,
}

pub const BUILTINS: &[CommandInfo] = &[
    builtins::cd::COMMAND_INFO,
    builtins::system::COMMAND_INFO_EXIT,
];

pub fn find_command(name: &str) -> Option<&'static CommandInfo> {
    BUILTINS.iter().find(|cmd| cmd.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(find_command("cd").map(|c| c.name), Some("cd"));
        assert_eq!(find_command("exit").map(|c| c.name), Some("exit"));
        assert!(find_command("history").is_none());
        assert!(find_command("ls").is_none());
    }
}
