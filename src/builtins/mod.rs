pub mod cd;
pub mod history;
pub mod registry;
pub mod system;

pub use registry::find_command;
