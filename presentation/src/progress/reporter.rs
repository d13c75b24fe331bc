//! Progress reporting for council dispatch

use colored::Colorize;
use council_application::ProgressNotifier;
use council_domain::{CouncilOpinion, CouncilResult};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::time::Duration;

/// Reports progress during a council dispatch with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    council_bar: Mutex<Option<ProgressBar>>,
    chairman_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            council_bar: Mutex::new(None),
            chairman_spinner: Mutex::new(None),
        }
    }

    fn council_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Stop any running bars, leaving them on screen
    pub fn abandon(&self) {
        if let Some(pb) = self.council_bar.lock().take() {
            pb.abandon_with_message("Council failed".red().to_string());
        }
        if let Some(pb) = self.chairman_spinner.lock().take() {
            pb.abandon();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_dispatch_start(&self, total_members: usize) {
        let pb = self.multi.add(ProgressBar::new(total_members as u64));
        pb.set_style(Self::council_style());
        pb.set_prefix("Council");
        pb.set_message("Consulting members...");
        pb.enable_steady_tick(Duration::from_millis(120));

        *self.council_bar.lock() = Some(pb);
    }

    fn on_member_complete(&self, opinion: &CouncilOpinion) {
        if let Some(pb) = self.council_bar.lock().as_ref() {
            let status = if opinion.is_success() {
                format!("{} {}", "v".green(), opinion.role_label)
            } else {
                format!("{} {}", "x".red(), opinion.role_label)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_dispatch_complete(&self, result: &CouncilResult) {
        if let Some(pb) = self.council_bar.lock().take() {
            pb.finish_with_message(format!(
                "{} ({} of {} responded)",
                "Opinions collected".green(),
                result.success_count(),
                result.opinions.len()
            ));
        }
    }

    fn on_synthesis_start(&self) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Chairman");
        pb.set_message("Synthesizing...");
        pb.enable_steady_tick(Duration::from_millis(120));

        *self.chairman_spinner.lock() = Some(pb);
    }

    fn on_synthesis_complete(&self, success: bool) {
        if let Some(pb) = self.chairman_spinner.lock().take() {
            if success {
                pb.finish_with_message("Recommendation ready".green().to_string());
            } else {
                pb.finish_with_message("Synthesis failed".red().to_string());
            }
        }
    }
}
