//! Interrupt handling while a child command runs.
//!
//! Ctrl-C is delivered to the whole foreground process group. The child
//! decides what an interrupt means; the parent ignores SIGINT until the
//! child exits and then reports whatever exit status the child chose.

use std::process::Command;

/// Ignores SIGINT in this process until dropped.
#[must_use]
pub struct InterruptGuard {
    #[cfg(unix)]
    previous: libc::sighandler_t,
}

impl InterruptGuard {
    /// Start ignoring SIGINT.
    pub fn install() -> Self {
        #[cfg(unix)]
        {
            // SAFETY: installing SIG_IGN has no handler code to race with.
            let previous = unsafe { libc::signal(libc::SIGINT, libc::SIG_IGN) };
            Self { previous }
        }

        #[cfg(not(unix))]
        {
            Self {}
        }
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            if self.previous != libc::SIG_ERR {
                // SAFETY: restores the disposition returned by signal() above.
                unsafe {
                    libc::signal(libc::SIGINT, self.previous);
                }
            }
        }
    }
}

/// Make sure the child starts with the default SIGINT disposition,
/// whatever the parent had installed.
pub fn reset_interrupt_in_child(command: &mut Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;

        // SAFETY: signal() is async-signal-safe, so it may run between fork and exec.
        unsafe {
            command.pre_exec(|| {
                libc::signal(libc::SIGINT, libc::SIG_DFL);
                Ok(())
            });
        }
    }

    #[cfg(not(unix))]
    {
        let _ = command;
    }
}
