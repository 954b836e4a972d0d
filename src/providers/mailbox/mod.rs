//! Mailbox session implementations.
//!
//! This module contains the [`Mailbox`] session trait, the
//! [`MailboxConnector`] that opens sessions, and the IMAP implementation of
//! both.
//!
//! # Architecture
//!
//! The trait surface is the capability set the scan/action pipeline needs —
//! search, batched fetch, mark-deleted, expunge, logout — with two session
//! modes. The design never upgrades a connection's mode: scanning runs over
//! a read-only session that is closed afterwards, and deletion opens a new
//! read-write session.

mod imap;
mod traits;

pub use imap::{ImapConnector, ImapMailbox};
pub use traits::{Mailbox, MailboxConnector, MailboxError, Result, SearchQuery, SessionMode};

#[cfg(test)]
pub use traits::{MockMailbox, MockMailboxConnector};
