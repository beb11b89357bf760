use std::sync::atomic::{AtomicI32, Ordering};

use nix::unistd::Pid;

/// The process currently eligible to receive a forwarded interrupt.
///
/// Written by the execution path around every spawn and wait, read from the
/// SIGINT handler. Only atomic loads and stores happen here, which keeps it
/// usable from signal context.
#[derive(Debug)]
pub struct ForegroundSlot {
    pid: AtomicI32,
}

/// The slot consulted by the interrupt handler.
pub static FOREGROUND: ForegroundSlot = ForegroundSlot::new();

impl ForegroundSlot {
    pub const fn new() -> Self {
        ForegroundSlot { pid: AtomicI32::new(0) }
    }

    pub fn set(&self, pid: u32) {
        self.pid.store(pid as i32, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.pid.store(0, Ordering::SeqCst);
    }

    /// `None` while idle.
    pub fn current(&self) -> Option<Pid> {
        match self.pid.load(Ordering::SeqCst) {
            pid if pid > 0 => Some(Pid::from_raw(pid)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_until_set() {
        let slot = ForegroundSlot::new();
        assert_eq!(slot.current(), None);

        slot.set(4242);
        assert_eq!(slot.current(), Some(Pid::from_raw(4242)));

        slot.clear();
        assert_eq!(slot.current(), None);
    }
}
