//! Last-write-wins sequencing for overlapping refreshes.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

/// Issued when a refresh starts; only the newest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Default)]
pub struct RefreshSequencer {
    latest: AtomicU64,
}

impl RefreshSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RefreshTicket {
        RefreshTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Stores `value` in `slot` unless a newer ticket has been issued since
    /// `ticket`. The check happens under the slot's write lock.
    pub async fn commit<T>(&self, ticket: RefreshTicket, slot: &RwLock<T>, value: T) -> bool {
        let mut guard = slot.write().await;
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "discarding stale refresh");
            return false;
        }
        *guard = value;
        true
    }
}
