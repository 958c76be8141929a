use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag used to stop a transfer between chunks.
///
/// Clones observe the same flag, so a signal handler can hold one clone
/// while the command loop passes another into the engine.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Returns true if the token was already cancelled.
    pub fn cancel(&self) -> bool {
        self.cancelled.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation before starting the next command.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let handler_side = token.clone();

        assert!(!token.is_cancelled());
        assert!(!handler_side.cancel());
        assert!(token.is_cancelled());
        assert!(handler_side.cancel());

        token.reset();
        assert!(!handler_side.is_cancelled());
    }
}
