//! Account domain types.
//!
//! Represents the mailbox a run operates against and the credentials used
//! to reach it. Both are created at the start of a run and dropped when the
//! user switches to a different mailbox.

use serde::{Deserialize, Serialize};

/// The remote mailbox a run is targeting.
///
/// Built once per run from the entered email address, either through
/// provider auto-detection or manual host entry, and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxTarget {
    /// Email address of the account.
    pub email: String,
    /// IMAP server hostname.
    pub host: String,
    /// Human-readable provider label (e.g., "Gmail", "Custom").
    pub provider_label: String,
}

impl MailboxTarget {
    /// Creates a target for the given address and server.
    pub fn new(
        email: impl Into<String>,
        host: impl Into<String>,
        provider_label: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            host: host.into(),
            provider_label: provider_label.into(),
        }
    }
}

/// Login credentials for a mailbox.
///
/// Held in memory for the lifetime of a run only. Deliberately not
/// serializable so the secret cannot end up in logs or on disk.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email address (the IMAP login name).
    pub email: String,
    /// Account password or app-specific password.
    pub secret: String,
}

impl Credentials {
    /// Creates credentials for the given address.
    pub fn new(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .finish()
    }
}
