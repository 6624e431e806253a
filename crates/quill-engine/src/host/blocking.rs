use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Commands that survive a blocked engine: queued, then replayed in order
/// once the block lifts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeferredCommand {
    Undo,
    Redo,
}

#[derive(Debug, Default)]
struct Shared {
    blocked: AtomicBool,
    queue: Mutex<VecDeque<DeferredCommand>>,
}

/// Flag set by background work while it owns the scene, plus the queue of
/// commands deferred meanwhile.
///
/// Cloning shares the state; the engine keeps one handle, the background
/// worker another.
#[derive(Debug, Clone, Default)]
pub struct BlockingState {
    shared: Arc<Shared>,
}

impl BlockingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_blocked(&self) -> bool {
        self.shared.blocked.load(Ordering::Acquire)
    }

    /// Sets the flag. Returns `true` when this actually changed it.
    pub fn set_blocked(&self, blocked: bool) -> bool {
        self.shared.blocked.swap(blocked, Ordering::AcqRel) != blocked
    }

    pub fn defer(&self, cmd: DeferredCommand) {
        self.queue().push_back(cmd);
    }

    /// Removes and returns every deferred command, oldest first.
    pub fn drain(&self) -> Vec<DeferredCommand> {
        self.queue().drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<DeferredCommand>> {
        // The queue holds plain values; a panic elsewhere cannot leave it
        // half-written.
        self.shared.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
