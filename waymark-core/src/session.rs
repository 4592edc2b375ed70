//! Search issuance ordering.
//!
//! Only the most recently issued search may determine the known set. The
//! session hands out monotonically increasing tickets at issue time and
//! classifies each completion: a stale response arriving after a newer
//! search was issued is `Superseded` and must be discarded.
//!
//! The session is a pure state machine so the async layer that drives it
//! stays thin; serialising access to it is the caller's concern.

/// Sequence number identifying one issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Classification of a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The ticket is the latest issued and nothing has been applied for it
    /// yet; its result determines the known set.
    Current,
    /// A newer search was issued (or this ticket already completed); the
    /// result must be discarded.
    Superseded,
}

/// Issues tickets and decides which completion wins.
///
/// # Examples
/// ```
/// use waymark_core::{Completion, SearchSession};
///
/// let mut session = SearchSession::default();
/// let first = session.issue();
/// let second = session.issue();
/// assert_eq!(session.finish(second), Completion::Current);
/// assert_eq!(session.finish(first), Completion::Superseded);
/// ```
#[derive(Debug, Default)]
pub struct SearchSession {
    issued: u64,
    applied: Option<u64>,
}

impl SearchSession {
    /// Issue a ticket for a new search, superseding any still in flight.
    pub fn issue(&mut self) -> SearchTicket {
        self.issued += 1;
        SearchTicket(self.issued)
    }

    /// Whether the ticket is the most recently issued.
    #[must_use]
    pub const fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Record a completion and classify it.
    ///
    /// Exactly one completion per issued generation is `Current`; repeats
    /// and stale tickets are `Superseded`.
    pub fn finish(&mut self, ticket: SearchTicket) -> Completion {
        if self.is_current(ticket) && self.applied != Some(ticket.0) {
            self.applied = Some(ticket.0);
            Completion::Current
        } else {
            Completion::Superseded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn latest_issued_ticket_is_current() {
        let mut session = SearchSession::default();
        let first = session.issue();
        let second = session.issue();

        assert!(!session.is_current(first));
        assert!(session.is_current(second));
    }

    #[rstest]
    fn stale_ticket_is_superseded_even_when_it_finishes_last() {
        let mut session = SearchSession::default();
        let slow = session.issue();
        let fast = session.issue();

        assert_eq!(session.finish(fast), Completion::Current);
        assert_eq!(session.finish(slow), Completion::Superseded);
    }

    #[rstest]
    fn a_ticket_wins_at_most_once() {
        let mut session = SearchSession::default();
        let ticket = session.issue();

        assert_eq!(session.finish(ticket), Completion::Current);
        assert_eq!(session.finish(ticket), Completion::Superseded);
    }

    #[rstest]
    fn issuing_supersedes_an_unfinished_ticket() {
        let mut session = SearchSession::default();
        let first = session.issue();
        let _second = session.issue();

        assert_eq!(session.finish(first), Completion::Superseded);
    }

    #[rstest]
    fn tickets_increase_monotonically() {
        let mut session = SearchSession::default();
        let first = session.issue();
        let second = session.issue();
        let third = session.issue();

        assert!(first < second);
        assert!(second < third);
    }
}
