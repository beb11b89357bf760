use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

/// Input lines recorded in entry order, capped at a fixed capacity.
///
/// Once full, recording a new line drops the oldest one. With a backing file
/// every recorded line is also appended to it.
#[derive(Debug)]
pub struct HistoryLog {
    entries: VecDeque<String>,
    capacity: usize,
    file: Option<PathBuf>,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        HistoryLog {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            file: None,
        }
    }

    /// Create a log backed by `path`, seeded with the file's most recent
    /// lines. A missing file is treated as an empty history.
    pub fn with_file(capacity: usize, path: PathBuf) -> Self {
        let mut log = HistoryLog::new(capacity);
        match load_lines(&path) {
            Ok(lines) => {
                for line in lines {
                    log.push(line);
                }
            }
            Err(e) => warn!("cannot load history from {}: {}", path.display(), e),
        }
        log.file = Some(path);
        log
    }

    /// Record one input line. Blank lines are ignored.
    pub fn record(&mut self, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return;
        }
        self.push(line.to_string());

        if let Some(path) = &self.file {
            if let Err(e) = append_line(path, line) {
                warn!("cannot write history to {}: {}", path.display(), e);
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    fn push(&mut self, line: String) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line);
    }
}

fn load_lines(path: &Path) -> io::Result<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.to_string())
            .collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(f, "{}", line)
}
