//! Latest-query-wins gating for availability lookups.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Discards answers to queries that a newer query has superseded.
///
/// Issue a ticket before each query for one logical action (for example
/// "tables for the booking form"); when the answer arrives, pass it through
/// [`QueryGate::accept`]. Only the answer for the most recent ticket is
/// kept, so a slow response can never overwrite a newer one.
///
/// # Examples
///
/// ```
/// use tablebook::availability::QueryGate;
///
/// let gate = QueryGate::new();
/// let first = gate.issue();
/// let second = gate.issue();
///
/// assert_eq!(gate.accept(first, "stale"), None);
/// assert_eq!(gate.accept(second, "fresh"), Some("fresh"));
/// ```
#[derive(Debug, Default)]
pub struct QueryGate {
    latest: AtomicU64,
}

impl QueryGate {
    /// Creates a gate with no queries issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issues a ticket for a new query, superseding all earlier ones.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns `true` if `ticket` belongs to the newest query.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Passes `answer` through if `ticket` is still current.
    pub fn accept<T>(&self, ticket: Ticket, answer: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(answer)
        } else {
            log::debug!("discarding superseded availability answer");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let gate = QueryGate::new();
        let a = gate.issue();
        let b = gate.issue();
        assert!(a < b);
        assert!(!gate.is_current(a));
        assert!(gate.is_current(b));
    }

    #[test]
    fn test_out_of_order_answers() {
        let gate = QueryGate::new();
        let slow = gate.issue();
        let fast = gate.issue();

        // The newer answer arrives first, then the stale one.
        assert_eq!(gate.accept(fast, vec![5, 6]), Some(vec![5, 6]));
        assert_eq!(gate.accept(slow, vec![5]), None);
    }

    #[test]
    fn test_current_ticket_accepted_repeatedly() {
        let gate = QueryGate::new();
        let ticket = gate.issue();
        assert_eq!(gate.accept(ticket, 1), Some(1));
        assert_eq!(gate.accept(ticket, 2), Some(2));
    }
}
