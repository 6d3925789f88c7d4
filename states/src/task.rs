//! Fetch tickets for latest-wins request handling.
//!
//! Every request a controller issues gets a `TaskId` carrying a monotonically
//! increasing generation. Issuing a new ticket cancels the previous one through its
//! `CancellationToken`; a response is applied only if its ticket is still current.
//!
//! # Usage
//!
//! ```ignore
//! let tickets = Tickets::default();
//! let first = tickets.issue();
//! let second = tickets.issue();
//!
//! assert!(first.is_cancelled());
//! assert!(!tickets.is_current(first.id()));
//! assert!(tickets.is_current(second.id()));
//! ```

use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

/// Identifier of one issued request.
///
/// Higher generations were issued later. Two ids compare equal only when they
/// refer to the same issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId {
    generation: u64,
}

impl TaskId {
    pub fn new(generation: u64) -> Self {
        Self { generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to an issued request with cooperative cancellation.
///
/// Cancelling does not abort the transport; the request future has to observe
/// `cancelled()` (usually through `tokio::select!`) to stop early.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

#[derive(Debug, Default)]
struct Latest {
    generation: u64,
    cancel_token: Option<CancellationToken>,
}

/// Issues tickets and remembers which one is current.
#[derive(Debug, Default)]
pub struct Tickets {
    latest: Mutex<Latest>,
}

impl Tickets {
    /// Issues a new ticket, cancelling whichever ticket was current before.
    pub fn issue(&self) -> TaskHandle {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = latest.cancel_token.take() {
            previous.cancel();
        }
        latest.generation += 1;
        let token = CancellationToken::new();
        latest.cancel_token = Some(token.clone());
        TaskHandle::new(TaskId::new(latest.generation), token)
    }

    pub fn is_current(&self, id: TaskId) -> bool {
        self.current() == id.generation
    }

    /// Generation of the most recently issued ticket, 0 before the first.
    pub fn current(&self) -> u64 {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_orders_by_generation() {
        assert!(TaskId::new(1) < TaskId::new(2));
        assert_eq!(TaskId::new(3), TaskId::new(3));
        assert_eq!(TaskId::new(7).generation(), 7);
    }

    #[test]
    fn task_handle_cancel_is_shared_between_clones() {
        let handle1 = TaskHandle::new(TaskId::new(1), CancellationToken::new());
        let handle2 = handle1.clone();
        let token = handle1.cancellation_token();

        assert!(!handle2.is_cancelled());
        handle1.cancel();

        assert!(handle2.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[test]
    fn first_ticket_is_generation_one() {
        let tickets = Tickets::default();
        assert_eq!(tickets.current(), 0);

        let ticket = tickets.issue();
        assert_eq!(ticket.id().generation(), 1);
        assert!(tickets.is_current(ticket.id()));
    }

    #[test]
    fn issuing_supersedes_and_cancels_previous() {
        let tickets = Tickets::default();
        let first = tickets.issue();
        let second = tickets.issue();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!tickets.is_current(first.id()));
        assert!(tickets.is_current(second.id()));
    }
}
