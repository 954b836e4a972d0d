//! mailsweep - an interactive bulk-mail unsubscribe and cleanup tool
//!
//! This crate scans an IMAP inbox for bulk mail, extracts candidate
//! unsubscribe links from message bodies, collects per-sender decisions
//! from the user, and executes them: opening links in throttled batches
//! and deleting confirmed senders' mail with a single expunge.

pub mod app;
pub mod config;
pub mod console;
pub mod domain;
pub mod providers;
pub mod services;

pub use app::App;
