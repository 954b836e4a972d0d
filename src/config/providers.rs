//! Known mail provider table.
//!
//! Maps common email providers to their IMAP hosts. Detection walks the
//! table in order and matches the pattern case-insensitively against the
//! entered address; the first hit wins. Addresses that match nothing fall
//! through to manual host entry.

/// A provider the tool can auto-detect from an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownProvider {
    /// Human-readable label shown to the user.
    pub label: &'static str,
    /// Lowercase substring matched against the entered address.
    pub pattern: &'static str,
    /// IMAP server hostname.
    pub host: &'static str,
}

/// Common service providers and their IMAP hosts, consulted in order.
pub const KNOWN_PROVIDERS: &[KnownProvider] = &[
    KnownProvider {
        label: "Gmail",
        pattern: "gmail",
        host: "imap.gmail.com",
    },
    KnownProvider {
        label: "Outlook",
        pattern: "outlook",
        host: "imap-mail.outlook.com",
    },
    KnownProvider {
        label: "Hotmail",
        pattern: "hotmail",
        host: "imap-mail.outlook.com",
    },
    KnownProvider {
        label: "Yahoo",
        pattern: "yahoo",
        host: "imap.mail.yahoo.com",
    },
    KnownProvider {
        label: "ATT",
        pattern: "att",
        host: "imap.mail.att.net",
    },
    KnownProvider {
        label: "Comcast",
        pattern: "comcast",
        host: "imap.comcast.net",
    },
    KnownProvider {
        label: "Verizon",
        pattern: "verizon",
        host: "incoming.verizon.net",
    },
    KnownProvider {
        label: "AOL",
        pattern: "aol",
        host: "imap.aol.com",
    },
    KnownProvider {
        label: "Zoho",
        pattern: "zoho",
        host: "imap.zoho.com",
    },
];

/// Provider label used for manually entered hosts.
pub const MANUAL_PROVIDER_LABEL: &str = "Custom";

/// Outcome of resolving a provider for an entered address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResolution {
    /// A known provider matched the address.
    Detected(&'static KnownProvider),
    /// The user supplied an IMAP host by hand.
    Manual(String),
    /// Nothing matched and no host was entered; ask for the address again.
    Retry,
}

/// Finds the first known provider matching `email`, if any.
pub fn detect(email: &str) -> Option<&'static KnownProvider> {
    let email = email.to_lowercase();
    KNOWN_PROVIDERS.iter().find(|p| email.contains(p.pattern))
}

/// Interprets a manual host entry made after failed detection.
///
/// A non-empty entry is taken verbatim as the IMAP host; an empty one means
/// the user wants to re-enter their address.
pub fn resolve_manual_entry(input: &str) -> ProviderResolution {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        ProviderResolution::Retry
    } else {
        ProviderResolution::Manual(trimmed.to_string())
    }
}

/// One-line banner listing the auto-detected providers.
pub fn detection_banner() -> String {
    let labels: Vec<&str> = KNOWN_PROVIDERS.iter().map(|p| p.label).collect();
    format!("Auto-detected providers: {}", labels.join(", "))
}
