//! Batch mailbox scanning.
//!
//! The [`ScanService`] turns one read-only mailbox session into a
//! [`ScanReport`]: a single keyword search produces a UID snapshot, the
//! snapshot is fetched in fixed-size batches, and every fetched message is
//! parsed, deduplicated by sender and classified by link presence.
//!
//! Partial failure is tolerated by design: a failed batch fetch is logged
//! and skipped, an unparseable message is skipped, a message without a
//! sender address is skipped. Only a failure of the outer search aborts the
//! scan.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use mail_parser::MessageParser;

use crate::domain::{ScanReport, SenderMatch};
use crate::providers::mailbox::{Mailbox, SearchQuery};
use crate::services::extractor::LinkExtractor;

/// Body keyword the scan searches for. Deletion re-uses it combined with a
/// sender filter so both operations target the same population.
pub const SCAN_KEYWORD: &str = "unsubscribe";

/// Number of messages fetched per batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Placeholder display name for senders whose name header is missing or
/// could not be decoded.
pub const UNKNOWN_SENDER: &str = "Unknown Sender";

/// Scans a mailbox for bulk-mail senders.
pub struct ScanService {
    extractor: LinkExtractor,
    batch_size: usize,
}

impl ScanService {
    /// Creates a scanner with the default extractor and batch size.
    pub fn new() -> Self {
        Self {
            extractor: LinkExtractor::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Overrides the fetch batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Runs one full scan over `mailbox` and closes it.
    ///
    /// The UID snapshot taken by the initial search is not refreshed even if
    /// new mail arrives mid-scan. The session is logged out on completion
    /// and best-effort on abort.
    pub async fn scan(&self, mut mailbox: Box<dyn Mailbox>) -> Result<ScanReport> {
        tracing::info!(keyword = SCAN_KEYWORD, "searching inbox");

        let query = SearchQuery::body_keyword(SCAN_KEYWORD);
        let uids = match mailbox.uid_search(&query).await {
            Ok(uids) => uids,
            Err(err) => {
                tracing::error!(stage = "search", error = %err, "scan aborted");
                if let Err(logout_err) = mailbox.logout().await {
                    tracing::warn!(error = %logout_err, "logout after failed search");
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            total = uids.len(),
            "messages matched, fetching in batches"
        );

        let progress = ProgressBar::new(uids.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed:>6}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
                .unwrap()
                .progress_chars("##-"),
        );
        progress.set_message("Scanning emails");

        let mut report = ScanReport::new();

        for (batch_index, batch) in uids.chunks(self.batch_size).enumerate() {
            let bodies = match mailbox.fetch_bodies(batch).await {
                Ok(bodies) => bodies,
                Err(err) => {
                    tracing::error!(
                        stage = "fetch",
                        batch = batch_index,
                        error = %err,
                        "batch fetch failed, skipping batch"
                    );
                    progress.inc(batch.len() as u64);
                    continue;
                }
            };

            for uid in batch {
                // UIDs the server did not return are simply absent.
                if let Some(raw) = bodies.get(uid) {
                    self.classify(raw, &mut report);
                }
                progress.inc(1);
            }
        }

        progress.finish_and_clear();
        tracing::info!(
            with_links = report.matches().len(),
            without_links = report.linkless().len(),
            "scan complete"
        );

        if let Err(err) = mailbox.logout().await {
            tracing::warn!(error = %err, "logout failed after scan");
        }

        Ok(report)
    }

    /// Parses one raw message and records its sender in the report.
    fn classify(&self, raw: &[u8], report: &mut ScanReport) {
        let Some(message) = MessageParser::default().parse(raw) else {
            return;
        };

        let Some(sender) = message.from().and_then(|a| a.as_list()).and_then(|l| l.first())
        else {
            return;
        };
        let Some(address) = sender.address().map(|a| a.to_string()) else {
            return;
        };

        if report.is_known_sender(&address) {
            return;
        }

        let display_name = sender
            .name()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

        let link = message
            .body_html(0)
            .and_then(|html| self.extractor.extract(&html));

        match link {
            Some(url) => report.push_match(SenderMatch::new(display_name, address, url)),
            None => report.push_linkless(display_name, address),
        }
    }
}

impl Default for ScanService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::providers::mailbox::{MailboxError, MockMailbox};

    fn html_message(name: &str, address: &str, body: &str) -> Vec<u8> {
        format!(
            "From: {name} <{address}>\r\nTo: me@example.com\r\nSubject: Deals\r\n\
             Content-Type: text/html; charset=utf-8\r\n\r\n{body}",
        )
        .into_bytes()
    }

    fn text_message(name: &str, address: &str, body: &str) -> Vec<u8> {
        format!(
            "From: {name} <{address}>\r\nTo: me@example.com\r\nSubject: Deals\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\r\n{body}",
        )
        .into_bytes()
    }

    fn unsub_body(url: &str) -> String {
        format!(r#"<p>Weekly deals!</p><a href="{url}">unsubscribe</a>"#)
    }

    fn expect_logout(mailbox: &mut MockMailbox) {
        mailbox.expect_logout().times(1).returning(|| Ok(()));
    }

    #[tokio::test]
    async fn scan_classifies_senders_by_link_presence() {
        let mut mailbox = MockMailbox::new();
        mailbox
            .expect_uid_search()
            .times(1)
            .returning(|_| Ok(vec![1, 2, 3]));
        mailbox.expect_fetch_bodies().times(1).returning(|uids| {
            assert_eq!(uids, &[1, 2, 3][..]);
            let mut bodies = HashMap::new();
            bodies.insert(
                1,
                html_message("Daily Deals", "deals@shop.example", &unsub_body("https://a/u")),
            );
            bodies.insert(
                2,
                html_message("No Escape", "noreply@spam.example", "<p>no links here</p>"),
            );
            bodies.insert(3, text_message("Plain", "plain@example.com", "hello"));
            Ok(bodies)
        });
        expect_logout(&mut mailbox);

        let report = ScanService::new().scan(Box::new(mailbox)).await.unwrap();

        assert_eq!(report.matches().len(), 1);
        assert_eq!(report.matches()[0].address, "deals@shop.example");
        assert_eq!(report.matches()[0].unsubscribe_link, "https://a/u");
        assert_eq!(report.linkless().len(), 2);
    }

    #[tokio::test]
    async fn failed_batch_is_skipped_not_fatal() {
        let mut mailbox = MockMailbox::new();
        // Three batches of two; the middle one fails.
        mailbox
            .expect_uid_search()
            .returning(|_| Ok(vec![1, 2, 3, 4, 5, 6]));
        mailbox.expect_fetch_bodies().times(3).returning(|uids| {
            if uids[0] == 3 {
                return Err(MailboxError::Protocol("FETCH failed".to_string()));
            }
            let mut bodies = HashMap::new();
            for uid in uids {
                bodies.insert(
                    *uid,
                    html_message(
                        &format!("Sender {uid}"),
                        &format!("s{uid}@example.com"),
                        &unsub_body(&format!("https://x/{uid}")),
                    ),
                );
            }
            Ok(bodies)
        });
        expect_logout(&mut mailbox);

        let report = ScanService::new()
            .with_batch_size(2)
            .scan(Box::new(mailbox))
            .await
            .unwrap();

        let addresses: Vec<_> = report.matches().iter().map(|m| m.address.as_str()).collect();
        assert_eq!(
            addresses,
            vec!["s1@example.com", "s2@example.com", "s5@example.com", "s6@example.com"]
        );
    }

    #[tokio::test]
    async fn duplicate_senders_across_batches_are_dropped() {
        let mut mailbox = MockMailbox::new();
        mailbox.expect_uid_search().returning(|_| Ok(vec![1, 2]));
        mailbox.expect_fetch_bodies().times(2).returning(|uids| {
            let mut bodies = HashMap::new();
            for uid in uids {
                bodies.insert(
                    *uid,
                    html_message("Daily Deals", "deals@shop.example", &unsub_body("https://a/u")),
                );
            }
            Ok(bodies)
        });
        expect_logout(&mut mailbox);

        let report = ScanService::new()
            .with_batch_size(1)
            .scan(Box::new(mailbox))
            .await
            .unwrap();

        assert_eq!(report.matches().len(), 1);
    }

    #[tokio::test]
    async fn missing_uids_and_broken_messages_are_skipped() {
        let mut mailbox = MockMailbox::new();
        mailbox.expect_uid_search().returning(|_| Ok(vec![1, 2, 3]));
        mailbox.expect_fetch_bodies().returning(|_| {
            let mut bodies = HashMap::new();
            // uid 1 absent entirely; uid 2 has no From header.
            bodies.insert(2, b"Subject: orphan\r\n\r\nhello".to_vec());
            bodies.insert(
                3,
                html_message("Keeper", "keep@example.com", &unsub_body("https://k/u")),
            );
            Ok(bodies)
        });
        expect_logout(&mut mailbox);

        let report = ScanService::new().scan(Box::new(mailbox)).await.unwrap();

        assert_eq!(report.matches().len(), 1);
        assert_eq!(report.matches()[0].address, "keep@example.com");
        assert!(report.linkless().is_empty());
    }

    #[tokio::test]
    async fn missing_display_name_gets_placeholder() {
        let mut mailbox = MockMailbox::new();
        mailbox.expect_uid_search().returning(|_| Ok(vec![1]));
        mailbox.expect_fetch_bodies().returning(|_| {
            let mut bodies = HashMap::new();
            bodies.insert(
                1,
                format!(
                    "From: bare@example.com\r\nContent-Type: text/html\r\n\r\n{}",
                    unsub_body("https://b/u")
                )
                .into_bytes(),
            );
            Ok(bodies)
        });
        expect_logout(&mut mailbox);

        let report = ScanService::new().scan(Box::new(mailbox)).await.unwrap();

        assert_eq!(report.matches()[0].display_name, UNKNOWN_SENDER);
    }

    #[tokio::test]
    async fn search_failure_aborts_but_still_logs_out() {
        let mut mailbox = MockMailbox::new();
        mailbox
            .expect_uid_search()
            .returning(|_| Err(MailboxError::Protocol("SEARCH failed".to_string())));
        expect_logout(&mut mailbox);

        let result = ScanService::new().scan(Box::new(mailbox)).await;

        assert!(result.is_err());
    }
}
