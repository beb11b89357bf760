use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use crate::error::ExecError;
use crate::parser::{OutputRedirect, WriteMode};

/// Permission bits for files created by `>` and `>>`, before the umask.
const CREATE_MODE: u32 = 0o644;

/// Open a file for an output redirect (stdout).
pub fn open_stdout_redirect(redirect: &OutputRedirect) -> Result<File, ExecError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).mode(CREATE_MODE);
    match redirect.mode {
        WriteMode::Truncate => options.truncate(true),
        WriteMode::Append => options.append(true),
    };
    options.open(&redirect.path).map_err(|source| ExecError::Redirect {
        path: redirect.path.clone(),
        source,
    })
}

/// Open a file for an input redirect (stdin).
pub fn open_stdin_redirect(path: &Path) -> Result<File, ExecError> {
    File::open(path).map_err(|source| ExecError::Redirect {
        path: path.to_path_buf(),
        source,
    })
}
