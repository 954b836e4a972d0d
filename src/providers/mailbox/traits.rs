//! Mailbox session trait definitions.
//!
//! This module defines the [`Mailbox`] and [`MailboxConnector`] traits which
//! abstract over the remote mailbox store. The scan and action services
//! depend only on this capability set (search, fetch, delete, expunge), not
//! on a specific protocol implementation.

use std::collections::HashMap;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{Credentials, MailboxTarget};

/// Result type alias for mailbox operations.
pub type Result<T> = std::result::Result<T, MailboxError>;

/// Errors that can occur during mailbox operations.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// Login was rejected or credentials are invalid.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network or connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// The server rejected or failed a protocol command.
    #[error("mailbox protocol error: {0}")]
    Protocol(String),
}

/// Permission level a session is opened with.
///
/// Scanning uses [`ReadOnly`](SessionMode::ReadOnly); deletion reopens a
/// fresh session in [`ReadWrite`](SessionMode::ReadWrite). A session is
/// never upgraded in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Flags cannot be changed; used for scanning.
    ReadOnly,
    /// Messages can be marked deleted and expunged.
    ReadWrite,
}

/// A server-side message search.
///
/// Renders to the split-token IMAP form (`BODY "kw" FROM "addr"`), which
/// stricter servers require.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keyword: String,
    from: Option<String>,
}

impl SearchQuery {
    /// Searches for messages whose body contains `keyword`.
    pub fn body_keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            from: None,
        }
    }

    /// Restricts the search to a single sender address.
    pub fn from_sender(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    /// Renders the IMAP search string.
    pub fn to_imap(&self) -> String {
        match &self.from {
            Some(address) => format!("BODY \"{}\" FROM \"{}\"", self.keyword, address),
            None => format!("BODY \"{}\"", self.keyword),
        }
    }
}

/// An open session against one mailbox folder.
///
/// All operations are blocking from the pipeline's point of view; nothing
/// here retries. Partial-failure policy belongs to the caller.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Mailbox: Send {
    /// Returns the UIDs matching `query`, in ascending order.
    ///
    /// The result is a snapshot; it is not refreshed if new mail arrives.
    async fn uid_search(&mut self, query: &SearchQuery) -> Result<Vec<u32>>;

    /// Fetches the full raw bodies of `uids`.
    ///
    /// The mapping may be partial: UIDs the server did not return are simply
    /// absent, not retried.
    async fn fetch_bodies(&mut self, uids: &[u32]) -> Result<HashMap<u32, Vec<u8>>>;

    /// Marks `uids` deleted. Requires a [`SessionMode::ReadWrite`] session.
    async fn mark_deleted(&mut self, uids: &[u32]) -> Result<()>;

    /// Permanently removes every message previously marked deleted.
    async fn expunge(&mut self) -> Result<()>;

    /// Closes the session.
    async fn logout(&mut self) -> Result<()>;
}

/// Opens sessions against a remote mailbox store.
///
/// Connect failures are never retried here; the run controller drives retry
/// by re-collecting credentials from the user.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MailboxConnector: Send + Sync {
    /// Connects, authenticates, and selects the inbox in `mode`.
    async fn connect(
        &self,
        target: &MailboxTarget,
        credentials: &Credentials,
        mode: SessionMode,
    ) -> Result<Box<dyn Mailbox>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_query_rendering() {
        let query = SearchQuery::body_keyword("unsubscribe");
        assert_eq!(query.to_imap(), "BODY \"unsubscribe\"");
    }

    #[test]
    fn from_filter_rendering() {
        let query = SearchQuery::body_keyword("unsubscribe").from_sender("news@shop.com");
        assert_eq!(query.to_imap(), "BODY \"unsubscribe\" FROM \"news@shop.com\"");
    }

    #[test]
    fn mailbox_error_display() {
        let auth = MailboxError::Authentication("bad password".to_string());
        assert_eq!(auth.to_string(), "authentication failed: bad password");

        let protocol = MailboxError::Protocol("SEARCH failed".to_string());
        assert!(protocol.to_string().contains("SEARCH failed"));
    }
}
