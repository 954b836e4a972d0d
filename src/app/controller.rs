//! Run controller.
//!
//! Sequences one full scan-decide-act cycle against a mailbox and offers to
//! repeat it on the same or a different mailbox. The controller owns the
//! session for the duration of one mode: scanning gets a read-only session
//! that is closed by the scanner, deletion opens its own write session.

use std::io;

use anyhow::Result;

use crate::app::state::{NextMove, RunState};
use crate::config;
use crate::console::{Console, StdConsole};
use crate::domain::{Credentials, MailboxTarget, ScanReport};
use crate::providers::browser::{BrowserLauncher, SystemBrowser};
use crate::providers::mailbox::{ImapConnector, Mailbox, MailboxConnector, SessionMode};
use crate::services::{ActionService, DecisionService, ScanService};

/// The interactive application: an unbounded loop of scan-decide-act
/// cycles, terminated only by the quit choice or process interruption.
pub struct App {
    console: Box<dyn Console>,
    browser: Box<dyn BrowserLauncher>,
    connector: Box<dyn MailboxConnector>,
    scanner: ScanService,
    decisions: DecisionService,
    actions: ActionService,
}

impl App {
    /// Creates the app wired to stdin/stdout, the system browser and IMAP.
    pub fn new() -> Self {
        Self::with_collaborators(
            Box::new(StdConsole),
            Box::new(SystemBrowser),
            Box::new(ImapConnector::new()),
        )
    }

    /// Creates the app with explicit collaborators.
    pub fn with_collaborators(
        console: Box<dyn Console>,
        browser: Box<dyn BrowserLauncher>,
        connector: Box<dyn MailboxConnector>,
    ) -> Self {
        Self {
            console,
            browser,
            connector,
            scanner: ScanService::new(),
            decisions: DecisionService::new(),
            actions: ActionService::new(),
        }
    }

    /// Runs cycles until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut state = RunState::fresh();
        loop {
            self.run_cycle(&mut state).await?;

            match self.next_move(&state)? {
                NextMove::SameMailbox => state = RunState::retaining_account(state),
                NextMove::DifferentMailbox => state = RunState::fresh(),
                NextMove::Quit => {
                    tracing::info!("exiting");
                    return Ok(());
                }
            }
        }
    }

    /// One scan-decide-act cycle.
    async fn run_cycle(&mut self, state: &mut RunState) -> Result<()> {
        let mailbox = self.connect_read_only(state).await?;

        match self.scanner.scan(mailbox).await {
            Ok(report) => state.report = report,
            Err(err) => {
                // The scan already logged the stage; the cycle goes on with
                // an empty report so the user can retry from the menu.
                tracing::error!(error = %err, "scan failed");
                state.report = ScanReport::default();
            }
        }

        if state.report.has_links() {
            self.decisions
                .collect(self.console.as_mut(), &mut state.report)?;
            self.actions
                .open_links(self.console.as_mut(), self.browser.as_ref(), &state.report)?;

            if let (Some(target), Some(credentials)) = (&state.target, &state.credentials) {
                if let Err(err) = self
                    .actions
                    .delete_marked(
                        self.console.as_mut(),
                        self.connector.as_ref(),
                        target,
                        credentials,
                        &state.report,
                    )
                    .await
                {
                    tracing::error!(error = %err, "deletion aborted");
                }
            }
        } else {
            tracing::info!("no unsubscribe links detected in search");
        }

        Ok(())
    }

    /// Opens a read-only session, collecting the account first if needed.
    ///
    /// A connect failure drops the whole account and starts over with fresh
    /// prompts. There is no retry cap; the user retries as long as they
    /// keep answering.
    async fn connect_read_only(&mut self, state: &mut RunState) -> Result<Box<dyn Mailbox>> {
        loop {
            if state.target.is_none() || state.credentials.is_none() {
                let (target, credentials) = self.collect_account()?;
                state.target = Some(target);
                state.credentials = Some(credentials);
            }

            let (Some(target), Some(credentials)) = (state.target.clone(), state.credentials.clone())
            else {
                continue;
            };

            let attempt = self
                .connector
                .connect(&target, &credentials, SessionMode::ReadOnly)
                .await;

            match attempt {
                Ok(mailbox) => return Ok(mailbox),
                Err(err) => {
                    tracing::error!(error = %err, host = %target.host, "login failed");
                    self.console.line("Login failed. Let's try again.");
                    *state = RunState::fresh();
                }
            }
        }
    }

    /// Prompts for an email address and resolves its provider, then for the
    /// password. Loops until a provider is detected or a host is entered
    /// manually.
    fn collect_account(&mut self) -> io::Result<(MailboxTarget, Credentials)> {
        self.console.line(&config::detection_banner());

        let target = loop {
            let email = self.console.prompt("\nEnter your email address: ")?;

            let resolution = match config::detect(&email) {
                Some(provider) => config::ProviderResolution::Detected(provider),
                None => {
                    self.console.line("\nProvider not auto-detected.");
                    let manual = self.console.prompt(
                        "Enter your IMAP server manually (e.g., imap.fastmail.com) \
                         or press Enter to retry email: ",
                    )?;
                    config::resolve_manual_entry(&manual)
                }
            };

            match resolution {
                config::ProviderResolution::Detected(provider) => {
                    tracing::info!(provider = provider.label, "detected provider");
                    break MailboxTarget::new(email, provider.host, provider.label);
                }
                config::ProviderResolution::Manual(host) => {
                    tracing::info!(host = %host, "using manual server");
                    break MailboxTarget::new(email, host, config::MANUAL_PROVIDER_LABEL);
                }
                config::ProviderResolution::Retry => continue,
            }
        };

        let secret = self
            .console
            .prompt_secret(&format!("Enter password for {}: ", target.email))?;
        let credentials = Credentials::new(target.email.clone(), secret);

        Ok((target, credentials))
    }

    /// The end-of-cycle menu; loops until a valid choice.
    fn next_move(&mut self, state: &RunState) -> io::Result<NextMove> {
        self.console.line(&format!("\n{}", "-".repeat(30)));
        loop {
            let email = state
                .target
                .as_ref()
                .map(|t| t.email.as_str())
                .unwrap_or("<none>");
            self.console.line(&format!("Current mailbox: {}", email));
            self.console.line(" [A] Run again on same mailbox");
            self.console.line(" [D] Different mailbox");
            self.console.line(" [Q] Quit");

            let choice = self.console.prompt("Choice: ")?;
            match choice.to_lowercase().as_str() {
                "a" => return Ok(NextMove::SameMailbox),
                "d" => return Ok(NextMove::DifferentMailbox),
                "q" => return Ok(NextMove::Quit),
                _ => continue,
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
