//! Run state management.
//!
//! One [`RunState`] backs one scan-decide-act cycle. The reset contract is
//! by construction: transitions build a new state rather than mutating the
//! old one, so "same mailbox" keeps only the account and "different
//! mailbox" is indistinguishable from a first run.

use crate::domain::{Credentials, MailboxTarget, ScanReport};

/// What the user chose at the end of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextMove {
    /// Run again against the same mailbox.
    SameMailbox,
    /// Collect a new mailbox and credentials.
    DifferentMailbox,
    /// Exit the program.
    Quit,
}

/// State owned by the run controller for one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    /// Mailbox the cycle operates against; collected on first need.
    pub target: Option<MailboxTarget>,
    /// Credentials for the target; held in memory only.
    pub credentials: Option<Credentials>,
    /// Result of this cycle's scan.
    pub report: ScanReport,
}

impl RunState {
    /// A state with nothing collected yet.
    pub fn fresh() -> Self {
        Self::default()
    }

    /// Same-mailbox reset: keeps the account, discards scan results.
    pub fn retaining_account(previous: Self) -> Self {
        Self {
            target: previous.target,
            credentials: previous.credentials,
            report: ScanReport::default(),
        }
    }
}
