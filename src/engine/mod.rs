mod state;
mod redirect;
mod foreground;
mod history;
mod execution;
mod control;

// Re-export the public API so that `main.rs` and `builtins/` can keep
// using `engine::ShellState`, `engine::evaluate`, etc.
pub use state::{ShellState, ExecutionResult};
pub use foreground::FOREGROUND;
pub use history::HistoryLog;
pub use control::evaluate;
