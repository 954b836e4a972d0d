//! Browser launcher.
//!
//! Opening an unsubscribe link is fire-and-forget: the tool hands the URL to
//! the operating system and never observes what the page does.

use anyhow::Result;

/// Launches URLs in the user's default browser.
pub trait BrowserLauncher {
    /// Opens `url`. No return value beyond launch success is observed.
    fn open_url(&self, url: &str) -> Result<()>;
}

/// [`BrowserLauncher`] backed by the operating system's default handler.
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open_url(&self, url: &str) -> Result<()> {
        opener::open(url)?;
        Ok(())
    }
}
