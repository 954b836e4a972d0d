//! External service implementations.
//!
//! This module contains provider traits and implementations for the external
//! collaborators the pipeline depends on:
//!
//! - [`mailbox`] - remote mailbox sessions (IMAP)
//! - [`browser`] - launching unsubscribe links in the default browser

pub mod browser;
pub mod mailbox;
