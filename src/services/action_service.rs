//! Decision execution.
//!
//! Consumes a decided [`ScanReport`] in two independent passes: opening
//! unsubscribe links in throttled batches, and deleting mail from confirmed
//! senders. Deletion re-targets the mailbox with fresh per-sender searches
//! rather than reusing the scan's UID snapshot, so mail that arrived between
//! scan and action is covered.

use std::io;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::console::Console;
use crate::domain::{Credentials, MailboxTarget, ScanReport};
use crate::providers::browser::BrowserLauncher;
use crate::providers::mailbox::{MailboxConnector, SearchQuery, SessionMode};
use crate::services::scan_service::SCAN_KEYWORD;

/// Number of links opened before pausing for acknowledgment.
pub const LINK_BATCH_SIZE: usize = 10;

/// Literal the user must type to confirm deletion.
pub const DELETE_CONFIRMATION: &str = "DELETE";

/// Executes the user's open/delete decisions.
pub struct ActionService {
    link_batch_size: usize,
}

impl ActionService {
    /// Creates an executor with the default link batch size.
    pub fn new() -> Self {
        Self {
            link_batch_size: LINK_BATCH_SIZE,
        }
    }

    /// Overrides the link batch size.
    pub fn with_link_batch_size(mut self, link_batch_size: usize) -> Self {
        self.link_batch_size = link_batch_size.max(1);
        self
    }

    /// Opens every pending unsubscribe link in discovery order.
    ///
    /// Links are opened in fixed-size batches with an explicit Enter
    /// acknowledgment between batches, so the browser is not flooded with
    /// simultaneous tabs. Opening is fire-and-forget: launch failures are
    /// logged and skipped, and nothing verifies the page actually
    /// unsubscribed anyone.
    pub fn open_links(
        &self,
        console: &mut dyn Console,
        browser: &dyn BrowserLauncher,
        report: &ScanReport,
    ) -> io::Result<()> {
        if !report.any_open_pending() {
            return Ok(());
        }

        tracing::info!("opening unsubscribe links");
        let links = report.pending_links();
        let total_batches = links.len().div_ceil(self.link_batch_size);

        for (index, batch) in links.chunks(self.link_batch_size).enumerate() {
            console.line(&format!("\nOpening batch {} of {}...", index + 1, total_batches));

            for link in batch.iter().copied() {
                if let Err(err) = browser.open_url(link) {
                    tracing::warn!(error = %err, link = %link, "failed to open link");
                }
            }

            if index + 1 < total_batches {
                console.prompt("Paused. Press 'Enter' to open the next batch of links...")?;
            }
        }

        Ok(())
    }

    /// Deletes mail from every sender with a pending delete intent.
    ///
    /// Gated by an exact typed `DELETE`; anything else cancels with zero
    /// mailbox mutations. On confirmation the mailbox is reopened in write
    /// mode (a failure here aborts before any state changes), each target
    /// gets a fresh keyword-plus-sender search, matched UIDs are marked
    /// deleted, and one expunge commits the whole pass only if anything was
    /// marked. Returns the number of messages marked.
    pub async fn delete_marked(
        &self,
        console: &mut dyn Console,
        connector: &dyn MailboxConnector,
        target: &MailboxTarget,
        credentials: &Credentials,
        report: &ScanReport,
    ) -> Result<u64> {
        if !report.any_delete_pending() {
            return Ok(0);
        }

        let targets = report.delete_targets();
        console.line(&format!(
            "\n[WARNING] You have selected to delete emails from {} senders.",
            targets.len()
        ));
        console.line("These cannot be recovered.");

        let confirmation = console.prompt("Type 'DELETE' to confirm: ")?;
        if confirmation != DELETE_CONFIRMATION {
            tracing::info!("deletion cancelled by user");
            return Ok(0);
        }

        tracing::info!("reopening mailbox in write mode for deletion");
        let mut mailbox = connector
            .connect(target, credentials, SessionMode::ReadWrite)
            .await?;

        let progress = ProgressBar::new(targets.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed:>6}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
                .unwrap()
                .progress_chars("##-"),
        );
        progress.set_message("Processing deletions");

        let mut total_marked: u64 = 0;
        for address in &targets {
            let query = SearchQuery::body_keyword(SCAN_KEYWORD).from_sender(*address);
            let uids = mailbox.uid_search(&query).await?;
            if !uids.is_empty() {
                mailbox.mark_deleted(&uids).await?;
                total_marked += uids.len() as u64;
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        if total_marked > 0 {
            tracing::info!(total = total_marked, "expunging messages from server");
            mailbox.expunge().await?;
            tracing::info!("expunge complete");
        } else {
            tracing::info!("no messages found to delete");
        }

        mailbox.logout().await?;
        Ok(total_marked)
    }
}

impl Default for ActionService {
    fn default() -> Self {
        Self::new()
    }
}
