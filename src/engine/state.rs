use std::path::PathBuf;

use crate::config::Config;
use super::foreground::{ForegroundSlot, FOREGROUND};
use super::history::HistoryLog;

pub struct ShellState {
    /// Directory to return to with `cd -`.
    pub previous_dir: Option<PathBuf>,
    pub history: HistoryLog,
    /// Exit status of the most recently executed pipeline.
    pub last_status: i32,
    pub foreground: &'static ForegroundSlot,
}

impl ShellState {
    pub fn new(config: &Config) -> Self {
        let history = match &config.history_file {
            Some(path) => HistoryLog::with_file(config.history_size, path.clone()),
            None => HistoryLog::new(config.history_size),
        };
        ShellState {
            previous_dir: None,
            history,
            last_status: 0,
            foreground: &FOREGROUND,
        }
    }

    /// State tracking its foreground child in `slot` instead of the
    /// process-wide slot.
    #[cfg(test)]
    pub fn with_foreground(slot: &'static ForegroundSlot) -> Self {
        ShellState {
            previous_dir: None,
            history: HistoryLog::new(16),
            last_status: 0,
            foreground: slot,
        }
    }
}

pub enum ExecutionResult {
    KeepRunning,
    Exit,
}
