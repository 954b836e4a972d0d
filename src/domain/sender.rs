//! Sender domain types.
//!
//! Represents the senders discovered by a mailbox scan and the per-sender
//! decisions the user makes about them. One [`ScanReport`] is the complete
//! product of one scan; it is rebuilt from scratch at the start of the next
//! cycle rather than cleared in place.

use serde::{Deserialize, Serialize};

/// A bulk-mail sender with an extractable unsubscribe link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderMatch {
    /// Decoded display name, or `"Unknown Sender"` when the header had none.
    pub display_name: String,
    /// Sender email address; the dedup key within a report.
    pub address: String,
    /// The first matching unsubscribe link found in this sender's mail.
    pub unsubscribe_link: String,
    /// Whether the user chose to open the unsubscribe link.
    pub open_link: bool,
    /// Whether the user chose to delete this sender's messages.
    pub delete_messages: bool,
}

impl SenderMatch {
    /// Creates a match with both intents unset.
    pub fn new(
        display_name: impl Into<String>,
        address: impl Into<String>,
        unsubscribe_link: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            address: address.into(),
            unsubscribe_link: unsubscribe_link.into(),
            open_link: false,
            delete_messages: false,
        }
    }
}

/// A sender whose messages matched the keyword search but yielded no link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinklessSender {
    /// Decoded display name, or `"Unknown Sender"`.
    pub display_name: String,
    /// Sender email address.
    pub address: String,
}

/// The deduplicated result of one mailbox scan.
///
/// Holds senders in discovery order. Later messages from an
/// already-recorded sender are silently dropped, never merged. A sender can
/// legitimately appear in both collections when its messages differ in link
/// presence across batches; that is accepted, not corrected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    matches: Vec<SenderMatch>,
    linkless: Vec<LinklessSender>,
}

impl ScanReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Senders with links, in discovery order.
    pub fn matches(&self) -> &[SenderMatch] {
        &self.matches
    }

    /// Senders without links, in discovery order.
    pub fn linkless(&self) -> &[LinklessSender] {
        &self.linkless
    }

    /// Whether the scan found at least one sender with a link.
    pub fn has_links(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Returns true if `address` is already covered by a recorded match.
    ///
    /// The membership test is case-sensitive substring containment, not
    /// exact equality, and directional: a stored address that is a substring
    /// of the candidate suppresses it.
    pub fn is_known_sender(&self, address: &str) -> bool {
        self.matches.iter().any(|m| address.contains(&m.address))
    }

    /// Records a newly discovered sender with a link.
    pub fn push_match(&mut self, sender: SenderMatch) {
        self.matches.push(sender);
    }

    /// Records a linkless sender unless one already covers its address.
    ///
    /// Dedup here consults only the linkless list, so a sender recorded
    /// linkless can later also gain a [`SenderMatch`] entry.
    pub fn push_linkless(&mut self, display_name: impl Into<String>, address: impl Into<String>) {
        let address = address.into();
        if self.linkless.iter().any(|s| address.contains(&s.address)) {
            return;
        }
        self.linkless.push(LinklessSender {
            display_name: display_name.into(),
            address,
        });
    }

    /// Applies a bulk decision to every match.
    ///
    /// Each flag only ever raises the corresponding intent; passing `false`
    /// leaves intents as they are.
    pub fn apply_bulk(&mut self, open_all: bool, delete_all: bool) {
        for sender in &mut self.matches {
            if open_all {
                sender.open_link = true;
            }
            if delete_all {
                sender.delete_messages = true;
            }
        }
    }

    /// Applies a per-sender decision by position in the match list.
    pub fn apply_single(&mut self, index: usize, open: bool, delete: bool) {
        if let Some(sender) = self.matches.get_mut(index) {
            if open {
                sender.open_link = true;
            }
            if delete {
                sender.delete_messages = true;
            }
        }
    }

    /// Whether any sender has a pending open-link intent.
    pub fn any_open_pending(&self) -> bool {
        self.matches.iter().any(|m| m.open_link)
    }

    /// Whether any sender has a pending delete intent.
    pub fn any_delete_pending(&self) -> bool {
        self.matches.iter().any(|m| m.delete_messages)
    }

    /// Links marked for opening, in discovery order.
    pub fn pending_links(&self) -> Vec<&str> {
        self.matches
            .iter()
            .filter(|m| m.open_link)
            .map(|m| m.unsubscribe_link.as_str())
            .collect()
    }

    /// Addresses marked for deletion, in discovery order.
    pub fn delete_targets(&self) -> Vec<&str> {
        self.matches
            .iter()
            .filter(|m| m.delete_messages)
            .map(|m| m.address.as_str())
            .collect()
    }
}
