use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

/// Proof that a request was started; carries its generation number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Latest result of one request kind. A completion is only stored when no
/// newer request of the same kind has started since its ticket was issued.
#[derive(Debug)]
pub struct ResultSlot<T> {
    generation: AtomicU64,
    latest: Mutex<Option<T>>,
}

impl<T: Clone> ResultSlot<T> {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
        }
    }

    /// Start a request, superseding every earlier ticket
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `value` if `ticket` is still current; returns whether it was kept
    pub fn complete(&self, ticket: Ticket, value: T) -> bool {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            return false;
        }
        *latest = Some(value);
        true
    }

    pub fn latest(&self) -> Option<T> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T: Clone> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
