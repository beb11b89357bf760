use std::path::PathBuf;

// ── AST types ──────────────────────────────────────────────────────────────

/// One whole input line: `;`-separated items, run left to right regardless
/// of how the previous item ended.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct CommandLine {
    pub items: Vec<SequenceItem>,
}

impl CommandLine {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An `&&` chain. Each pipeline runs only if the one before it exited 0.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SequenceItem {
    pub pipelines: Vec<Pipeline>,
}

/// A pipeline is one or more commands connected by `|`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Pipeline {
    pub commands: Vec<ParsedCommand>, // length ≥ 1
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ParsedCommand {
    /// Program name followed by its arguments; never empty.
    pub argv: Vec<String>,
    /// `< file`
    pub stdin: Option<PathBuf>,
    /// `> file` or `>> file`
    pub stdout: Option<OutputRedirect>,
}

impl ParsedCommand {
    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WriteMode {
    /// `>`  - truncate the target first
    Truncate,
    /// `>>` - append to the target
    Append,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OutputRedirect {
    pub path: PathBuf,
    pub mode: WriteMode,
}

/// Structural tokens produced by the first parsing pass.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    Word(String),
    /// `;`
    Semi,
    /// `&&`
    And,
    /// `|`
    Pipe,
    /// `<`
    RedirIn,
    /// `>`
    RedirOut,
    /// `>>`
    RedirAppend,
}
