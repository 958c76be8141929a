use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cusi_engine::CancelToken;
use tracing::debug;

use crate::exit::{CliError, CliResult, INTERNAL, INTERRUPTED, SUCCESS};

/// Ctrl-C state shared between the signal handler and the shell.
///
/// Idle: Ctrl-C leaves the program. Busy: the first Ctrl-C cancels the
/// running command between chunks, a second one leaves immediately.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    cancel: CancelToken,
    busy: Arc<AtomicBool>,
}

/// What the handler should do for one Ctrl-C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Cancel,
    Exit(i32),
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Mark a command as running until the guard drops.
    pub fn begin(&self) -> BusyGuard<'_> {
        self.cancel.reset();
        self.busy.store(true, Ordering::SeqCst);
        BusyGuard { interrupt: self }
    }

    pub fn on_signal(&self) -> Action {
        if !self.busy.load(Ordering::SeqCst) {
            return Action::Exit(SUCCESS);
        }
        if self.cancel.cancel() {
            Action::Exit(INTERRUPTED)
        } else {
            Action::Cancel
        }
    }

    pub fn install(&self) -> CliResult<()> {
        let interrupt = self.clone();
        ctrlc::set_handler(move || match interrupt.on_signal() {
            Action::Cancel => debug!("cancellation requested"),
            Action::Exit(code) => {
                println!();
                std::process::exit(code);
            }
        })
        .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
    }
}

pub struct BusyGuard<'a> {
    interrupt: &'a Interrupt,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.interrupt.busy.store(false, Ordering::SeqCst);
        self.interrupt.cancel.reset();
    }
}
