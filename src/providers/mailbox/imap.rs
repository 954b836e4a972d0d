//! IMAP mailbox implementation.
//!
//! Implements [`Mailbox`] and [`MailboxConnector`] over IMAP4rev1 (RFC 3501)
//! via `async-imap`, with rustls TLS on the standard implicit-TLS port.
//!
//! Mode handling follows the protocol's own split: read-only sessions select
//! the inbox with `EXAMINE`, read-write sessions with `SELECT`. Deletion is
//! the usual two-step: `STORE +FLAGS (\Deleted)` marks, `EXPUNGE` commits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::ClientConfig;
use tokio_rustls::TlsConnector;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

use super::{Mailbox, MailboxConnector, MailboxError, Result, SearchQuery, SessionMode};
use crate::domain::{Credentials, MailboxTarget};

/// Standard implicit-TLS IMAP port.
const IMAP_TLS_PORT: u16 = 993;

/// Type alias for the IMAP session with TLS (using tokio-util compat layer).
type ImapSession = async_imap::Session<Compat<TlsStream<TcpStream>>>;

/// An authenticated IMAP session with the inbox selected.
pub struct ImapMailbox {
    session: ImapSession,
}

/// Opens [`ImapMailbox`] sessions.
pub struct ImapConnector;

impl ImapConnector {
    /// Creates a connector.
    pub fn new() -> Self {
        Self
    }

    /// Establishes a TLS connection with a futures compat wrapper.
    async fn connect_tls(host: &str) -> Result<Compat<TlsStream<TcpStream>>> {
        let tcp_stream = TcpStream::connect((host, IMAP_TLS_PORT))
            .await
            .map_err(|e| MailboxError::Connection(format!("TCP connect failed: {}", e)))?;

        let config = ClientConfig::builder()
            .with_root_certificates(tokio_rustls::rustls::RootCertStore::from_iter(
                webpki_roots::TLS_SERVER_ROOTS.iter().cloned(),
            ))
            .with_no_client_auth();

        let connector = TlsConnector::from(Arc::new(config));
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| MailboxError::Connection(format!("invalid server name: {}", e)))?;

        let tls_stream = connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| MailboxError::Connection(format!("TLS handshake failed: {}", e)))?;

        // Wrap with tokio-util compat layer for futures async read/write traits
        Ok(tls_stream.compat())
    }
}

impl Default for ImapConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailboxConnector for ImapConnector {
    async fn connect(
        &self,
        target: &MailboxTarget,
        credentials: &Credentials,
        mode: SessionMode,
    ) -> Result<Box<dyn Mailbox>> {
        tracing::info!(host = %target.host, "connecting");
        let tls_stream = Self::connect_tls(&target.host).await?;

        let client = async_imap::Client::new(tls_stream);

        let mut session = client
            .login(&credentials.email, &credentials.secret)
            .await
            .map_err(|e| MailboxError::Authentication(format!("IMAP login failed: {:?}", e.0)))?;

        match mode {
            SessionMode::ReadOnly => {
                session
                    .examine("INBOX")
                    .await
                    .map_err(|e| MailboxError::Protocol(format!("EXAMINE failed: {}", e)))?;
            }
            SessionMode::ReadWrite => {
                session
                    .select("INBOX")
                    .await
                    .map_err(|e| MailboxError::Protocol(format!("SELECT failed: {}", e)))?;
            }
        }

        tracing::info!(
            host = %target.host,
            read_only = matches!(mode, SessionMode::ReadOnly),
            "login successful"
        );
        Ok(Box::new(ImapMailbox { session }))
    }
}

impl ImapMailbox {
    /// Consumes a stream to completion.
    async fn drain_stream<T, E>(
        stream: impl futures::Stream<Item = std::result::Result<T, E>>,
    ) -> std::result::Result<(), E> {
        futures::pin_mut!(stream);
        while let Some(result) = stream.next().await {
            result?;
        }
        Ok(())
    }

    /// Builds the comma-separated UID sequence-set for a fetch or store.
    fn uid_sequence(uids: &[u32]) -> String {
        uids.iter()
            .map(|u| u.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl Mailbox for ImapMailbox {
    async fn uid_search(&mut self, query: &SearchQuery) -> Result<Vec<u32>> {
        let uids = self
            .session
            .uid_search(query.to_imap())
            .await
            .map_err(|e| MailboxError::Protocol(format!("SEARCH failed: {}", e)))?;

        // The server returns an unordered set; batch processing needs a
        // stable ascending order.
        let mut uid_list: Vec<u32> = uids.into_iter().collect();
        uid_list.sort_unstable();
        Ok(uid_list)
    }

    async fn fetch_bodies(&mut self, uids: &[u32]) -> Result<HashMap<u32, Vec<u8>>> {
        if uids.is_empty() {
            return Ok(HashMap::new());
        }

        let uid_seq = Self::uid_sequence(uids);
        let fetches = self
            .session
            .uid_fetch(&uid_seq, "(UID BODY[])")
            .await
            .map_err(|e| MailboxError::Protocol(format!("FETCH failed: {}", e)))?;

        let mut bodies = HashMap::new();
        let mut stream = fetches;

        while let Some(fetch_result) = stream.next().await {
            let fetch =
                fetch_result.map_err(|e| MailboxError::Protocol(format!("FETCH stream: {}", e)))?;
            if let (Some(uid), Some(body)) = (fetch.uid, fetch.body()) {
                bodies.insert(uid, body.to_vec());
            }
        }

        Ok(bodies)
    }

    async fn mark_deleted(&mut self, uids: &[u32]) -> Result<()> {
        if uids.is_empty() {
            return Ok(());
        }

        let uid_seq = Self::uid_sequence(uids);
        let store_stream = self
            .session
            .uid_store(&uid_seq, "+FLAGS (\\Deleted)")
            .await
            .map_err(|e| MailboxError::Protocol(format!("STORE failed: {}", e)))?;
        Self::drain_stream(store_stream)
            .await
            .map_err(|e| MailboxError::Protocol(format!("STORE stream: {}", e)))?;

        Ok(())
    }

    async fn expunge(&mut self) -> Result<()> {
        let expunge_stream = self
            .session
            .expunge()
            .await
            .map_err(|e| MailboxError::Protocol(format!("EXPUNGE failed: {}", e)))?;
        Self::drain_stream(expunge_stream)
            .await
            .map_err(|e| MailboxError::Protocol(format!("EXPUNGE stream: {}", e)))?;

        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.session
            .logout()
            .await
            .map_err(|e| MailboxError::Connection(format!("LOGOUT failed: {}", e)))
    }
}
