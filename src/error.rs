//! Error types shared across the interpreter.

use std::io;
use std::path::PathBuf;

/// A line that could not be turned into a [`crate::parser::CommandLine`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error: expected a file name after `{operator}`")]
    MissingRedirectTarget { operator: &'static str },

    #[error("syntax error near `{0}`")]
    Unexpected(String),
}

/// Failure to get an external program running.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("{}: {source}", path.display())]
    Redirect { path: PathBuf, source: io::Error },

    #[error("{program}: command not found")]
    NotFound { program: String },

    #[error("{program}: {source}")]
    Exec { program: String, source: io::Error },

    #[error("cannot create process for {program}: {source}")]
    Spawn { program: String, source: io::Error },
}

impl ExecError {
    /// Classify a `spawn()` failure. Errors caused by the program image
    /// itself are per-command failures; anything else means the system
    /// could not create a process at all.
    pub fn from_spawn(program: &str, source: io::Error) -> Self {
        let program = program.to_string();
        match source.kind() {
            io::ErrorKind::NotFound => ExecError::NotFound { program },
            io::ErrorKind::PermissionDenied => ExecError::Exec { program, source },
            _ if is_image_error(&source) => ExecError::Exec { program, source },
            _ => ExecError::Spawn { program, source },
        }
    }

    /// Resource-level failures abandon the whole pipeline.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecError::Spawn { .. })
    }
}

fn is_image_error(err: &io::Error) -> bool {
    use nix::errno::Errno;

    matches!(
        err.raw_os_error().map(Errno::from_raw),
        Some(Errno::ENOEXEC | Errno::ENOTDIR | Errno::EISDIR | Errno::ELOOP | Errno::ENAMETOOLONG | Errno::ETXTBSY)
    )
}

/// Failures of commands executed inside the interpreter process.
#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
    #[error("HOME not set")]
    NoHome,

    #[error("OLDPWD not set")]
    NoPreviousDir,

    #[error("too many arguments")]
    TooManyArgs,

    #[error("{}: {source}", path.display())]
    Chdir { path: PathBuf, source: io::Error },

    #[error("{}: Not a directory", path.display())]
    NotADirectory { path: PathBuf },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("history size must be at least 1")]
    ZeroHistorySize,
}
