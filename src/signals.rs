use std::os::fd::BorrowedFd;
use std::sync::OnceLock;

use nix::errno::Errno;
use nix::libc;
use nix::sys::signal::{kill, sigaction, signal, SaFlags, SigAction, SigHandler, SigSet, Signal};
use tracing::warn;

use crate::engine::FOREGROUND;

/// `"\n" + prompt`, written by the SIGINT handler while no child is running.
static PROMPT_BYTES: OnceLock<Vec<u8>> = OnceLock::new();

/// Install the interpreter's signal dispositions.
///
/// SIGINT is forwarded to the foreground child, or redraws the prompt when
/// idle. SIGQUIT and SIGTSTP are ignored so the interpreter survives them.
pub fn init(prompt: &str) -> nix::Result<()> {
    let _ = PROMPT_BYTES.set(format!("\n{}", prompt).into_bytes());

    let on_interrupt = SigAction::new(
        SigHandler::Handler(handle_sigint),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    unsafe {
        sigaction(Signal::SIGINT, &on_interrupt)?;
        signal(Signal::SIGQUIT, SigHandler::SigIgn)?;
        signal(Signal::SIGTSTP, SigHandler::SigIgn)?;
    }
    Ok(())
}

/// Restore default signal handling. Runs in the child between fork and exec,
/// so it sticks to async-signal-safe calls.
pub fn restore_default() -> std::io::Result<()> {
    unsafe {
        signal(Signal::SIGINT, SigHandler::SigDfl)?;
        signal(Signal::SIGQUIT, SigHandler::SigDfl)?;
        signal(Signal::SIGTSTP, SigHandler::SigDfl)?;
    }
    interrupt_set().thread_unblock()?;
    Ok(())
}

extern "C" fn handle_sigint(_: libc::c_int) {
    let saved = Errno::last_raw();
    match FOREGROUND.current() {
        Some(pid) => {
            let _ = kill(pid, Signal::SIGINT);
        }
        None => {
            if let Some(prompt) = PROMPT_BYTES.get() {
                let stdout = unsafe { BorrowedFd::borrow_raw(libc::STDOUT_FILENO) };
                let _ = nix::unistd::write(stdout, prompt);
            }
        }
    }
    Errno::set_raw(saved);
}

fn interrupt_set() -> SigSet {
    let mut set = SigSet::empty();
    set.add(Signal::SIGINT);
    set
}

/// Holds SIGINT pending on the calling thread until dropped.
///
/// Wrapped around "spawn, then publish the pid" so an interrupt cannot land
/// between the two and find the interpreter looking idle.
pub struct InterruptMask {
    set: SigSet,
}

impl InterruptMask {
    pub fn block() -> Self {
        let set = interrupt_set();
        if let Err(e) = set.thread_block() {
            warn!("cannot block SIGINT: {}", e);
        }
        InterruptMask { set }
    }
}

impl Drop for InterruptMask {
    fn drop(&mut self) {
        if let Err(e) = self.set.thread_unblock() {
            warn!("cannot unblock SIGINT: {}", e);
        }
    }
}
