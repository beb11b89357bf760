use std::io::{self, Write};

use crate::engine::HistoryLog;

/// Whether `line` asks for the history listing. Matched as a prefix of the
/// raw line rather than as a parsed command.
pub fn is_history_request(line: &str) -> bool {
    line.trim_start().starts_with("history")
}

/// Print all recorded history entries, numbered starting from 1.
pub fn run(history: &HistoryLog, out: &mut impl Write) -> io::Result<()> {
    for (i, entry) in history.entries().enumerate() {
        writeln!(out, "{:>5}  {}", i + 1, entry)?;
    }
    out.flush()
}
