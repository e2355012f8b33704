//! Console output for a run and the interactive continue prompt

use std::io::{self, BufRead, Write};
use std::path::Path;

use orgclone_core::{
    CloneFailure, CloneOutcome, Confirm, Exclusion, RepositoryDescriptor, RunObserver, RunSummary,
    SshAgentStatus,
};

/// Prints progress and the final summary to stdout
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    no_emoji: bool,
}

impl ConsoleReporter {
    /// Reporter that prints ASCII markers when `no_emoji` is set
    pub fn new(no_emoji: bool) -> Self {
        Self { no_emoji }
    }

    fn icon<'a>(&self, emoji_char: &'a str, ascii_alt: &'a str) -> &'a str {
        emoji(self.no_emoji, emoji_char, ascii_alt)
    }
}

impl RunObserver for ConsoleReporter {
    fn target_dir(&self, path: &Path) {
        println!("Cloning repositories to: {}", path.display());
    }

    fn ssh_agent(&self, status: SshAgentStatus) {
        println!();
        println!("Checking SSH configuration...");
        if status.is_ready() {
            println!("{} {}", self.icon("✅", "[OK]"), status);
        } else {
            println!("{}  {}", self.icon("⚠️", "[WARN]"), status);
            println!("Warning: SSH issues detected. Consider using HTTPS instead or fix SSH setup.");
        }
    }

    fn listing_started(&self, org: &str) {
        println!();
        println!("Fetching repositories for organization: {}", org);
    }

    fn page_started(&self, _org: &str, page: u32) {
        println!("Fetching page {}...", page);
    }

    fn page_fetched(&self, _org: &str, page: u32, count: usize) {
        println!("Found {} repositories on page {}", count, page);
    }

    fn listed(&self, org: &str, count: usize) {
        println!("Total repositories found for {}: {}", org, count);
    }

    fn excluded(&self, repo: &RepositoryDescriptor, reason: Exclusion) {
        println!("Skipping {}: {}", reason, repo.name);
    }

    fn planned(&self, count: usize) {
        println!();
        println!("Will clone {} repositories", count);
    }

    fn clone_started(&self, index: usize, total: usize, repo: &RepositoryDescriptor) {
        println!();
        println!("[{}/{}] {} Cloning {}...", index, total, self.icon("📦", "[..]"), repo.name);
    }

    fn clone_finished(&self, repo: &RepositoryDescriptor, outcome: &CloneOutcome) {
        match outcome {
            CloneOutcome::Cloned => {
                println!("{} Successfully cloned {}", self.icon("✅", "[OK]"), repo.name);
            }
            CloneOutcome::AlreadyExists => {
                println!(
                    "{}  {} already exists, skipping...",
                    self.icon("⚠️", "[SKIP]"),
                    repo.name
                );
            }
            CloneOutcome::Failed(CloneFailure::ClientMissing { .. }) => {
                println!("{} Git is not installed or not in PATH", self.icon("❌", "[FAIL]"));
            }
            CloneOutcome::Failed(failure) => {
                println!(
                    "{} Failed to clone {}: {}",
                    self.icon("❌", "[FAIL]"),
                    repo.name,
                    failure
                );
            }
        }
    }

    fn finished(&self, summary: &RunSummary) {
        let rule = "=".repeat(50);
        println!();
        println!("{}", rule);
        println!("SUMMARY");
        println!("{}", rule);
        println!("Total repositories: {}", summary.total);
        println!("Successfully cloned: {}", summary.cloned);
        println!("Already present: {}", summary.already_present);
        println!("Failed: {}", summary.failed);
        println!();

        if summary.all_succeeded() {
            println!("{} All repositories cloned successfully!", self.icon("🎉", "[DONE]"));
        } else {
            println!(
                "{}  {} repositories failed to clone. Check the output above for details.",
                self.icon("⚠️", "[WARN]"),
                summary.failed
            );
        }
    }
}

/// Asks on stdin; anything but `y`/`yes` (or EOF) declines
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        print!("{} (y/n): ", question);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn emoji<'a>(no_emoji: bool, emoji_char: &'a str, ascii_alt: &'a str) -> &'a str {
    if no_emoji {
        ascii_alt
    } else {
        emoji_char
    }
}
