//! Per-sender decision collection.
//!
//! Displays scan results and walks the user through deciding, for each
//! discovered sender, whether to open its unsubscribe link and whether to
//! delete its messages. Decisions can be applied in bulk (`all`) or one
//! sender at a time.

use std::io;

use crate::console::{ask_yes_no, Console};
use crate::domain::ScanReport;

/// Collects open/delete intents for every sender in a report.
pub struct DecisionService;

impl DecisionService {
    /// Creates a decision service.
    pub fn new() -> Self {
        Self
    }

    /// Shows scan results and records the user's decisions on `report`.
    ///
    /// Does nothing beyond the summary when the scan found no senders with
    /// links; the caller then skips the whole act phase.
    pub fn collect(&self, console: &mut dyn Console, report: &mut ScanReport) -> io::Result<()> {
        self.display_results(console, report);

        if !report.has_links() {
            return Ok(());
        }

        console.line("\n--- Decision Time ---");
        console.line("Review the list above. You can choose to open links or delete emails.");

        let mode =
            console.prompt("\nType 'all' to process all senders, or 'each' to decide one by one: ")?;

        if mode.eq_ignore_ascii_case("all") {
            let open_all = ask_yes_no(console, "Open ALL unsubscribe links? (Y/N): ")?;
            let delete_all = ask_yes_no(console, "Delete ALL emails from these senders? (Y/N): ")?;
            report.apply_bulk(open_all, delete_all);
        } else {
            // Anything other than "all" falls through to one-by-one mode.
            for index in 0..report.matches().len() {
                console.line(&format!("\nSender: {}", report.matches()[index].display_name));
                let open = ask_yes_no(console, "  Open unsubscribe link? (Y/N): ")?;
                let delete = ask_yes_no(console, "  Delete emails from this sender? (Y/N): ")?;
                report.apply_single(index, open, delete);
            }
        }

        Ok(())
    }

    fn display_results(&self, console: &mut dyn Console, report: &ScanReport) {
        console.line("\n========================================");
        console.line("          SCAN RESULTS          ");
        console.line("========================================");

        if !report.linkless().is_empty() {
            console.line(&format!(
                "\n[!] Senders found (but NO unsubscribe link detected): {}",
                report.linkless().len()
            ));
        }

        if !report.matches().is_empty() {
            console.line(&format!(
                "\n[+] Senders found WITH unsubscribe links: {}",
                report.matches().len()
            ));
            for (index, sender) in report.matches().iter().enumerate() {
                console.line(&format!(
                    " {}. {} ({})",
                    index + 1,
                    sender.display_name,
                    sender.address
                ));
            }
        }
    }
}

impl Default for DecisionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::console::testing::ScriptedConsole;
    use crate::domain::SenderMatch;

    fn report_with(addresses: &[&str]) -> ScanReport {
        let mut report = ScanReport::new();
        for address in addresses {
            report.push_match(SenderMatch::new("Sender", *address, "https://x/u"));
        }
        report
    }

    #[test]
    fn bulk_mode_applies_to_every_sender() {
        let mut report = report_with(&["a@example.com", "b@example.com"]);
        let mut console = ScriptedConsole::new(&["all", "y", "n"]);

        DecisionService::new()
            .collect(&mut console, &mut report)
            .unwrap();

        assert!(report.matches().iter().all(|m| m.open_link));
        assert!(report.matches().iter().all(|m| !m.delete_messages));
    }

    #[test]
    fn each_mode_decides_per_sender() {
        let mut report = report_with(&["a@example.com", "b@example.com"]);
        let mut console = ScriptedConsole::new(&["each", "y", "n", "n", "y"]);

        DecisionService::new()
            .collect(&mut console, &mut report)
            .unwrap();

        assert!(report.matches()[0].open_link);
        assert!(!report.matches()[0].delete_messages);
        assert!(!report.matches()[1].open_link);
        assert!(report.matches()[1].delete_messages);
    }

    #[test]
    fn invalid_answers_reprompt_until_resolved() {
        let mut report = report_with(&["a@example.com"]);
        let mut console = ScriptedConsole::new(&["each", "yes", "ok", "y", "", "n"]);

        DecisionService::new()
            .collect(&mut console, &mut report)
            .unwrap();

        assert!(report.matches()[0].open_link);
        assert!(!report.matches()[0].delete_messages);
    }

    #[test]
    fn no_links_skips_all_prompts() {
        let mut report = ScanReport::new();
        report.push_linkless("Quiet", "quiet@example.com");
        // No scripted answers: any prompt would error out.
        let mut console = ScriptedConsole::new(&[]);

        DecisionService::new()
            .collect(&mut console, &mut report)
            .unwrap();

        assert!(!report.has_links());
    }

    #[test]
    fn summary_numbers_senders_in_discovery_order() {
        let mut report = report_with(&["a@example.com", "b@example.com"]);
        let mut console = ScriptedConsole::new(&["all", "n", "n"]);

        DecisionService::new()
            .collect(&mut console, &mut report)
            .unwrap();

        let listed: Vec<_> = console
            .output
            .iter()
            .filter(|line| line.contains("@example.com"))
            .collect();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].starts_with(" 1. "));
        assert!(listed[1].starts_with(" 2. "));
    }
}
