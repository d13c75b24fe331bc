//! Console output formatter for council results

use colored::Colorize;
use council_domain::{CouncilResult, Stage};

/// Formats council results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete council result
    pub fn format(result: &CouncilResult) -> String {
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("Chairman's Council"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Query:".cyan().bold(), result.query));
        output.push_str(&format!(
            "{} {}  {} {}\n",
            "Session:".cyan().bold(),
            result.session_id,
            "Stage:".cyan().bold(),
            result.stage
        ));

        // Stage 1: Council opinions
        output.push_str(&Self::section_header(&format!(
            "Council Opinions ({}/{} responded)",
            result.success_count(),
            result.opinions.len()
        )));
        for opinion in result.opinions.values() {
            match (opinion.response(), opinion.error()) {
                (Some(response), _) => output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", opinion.role_label).yellow().bold(),
                    response
                )),
                (None, error) => output.push_str(&format!(
                    "\n{}\nError: {}\n",
                    format!("── {} ──", opinion.role_label).red().bold(),
                    error.unwrap_or("Unknown")
                )),
            }
        }

        // Stage 2: Chairman synthesis (if it ran)
        if let Some(synthesis) = &result.synthesis {
            output.push_str(&Self::section_header("Chairman's Recommendation"));
            output.push_str(&format!(
                "\n{}\n\n{}\n",
                format!("Chairman: {}", synthesis.chairman_model)
                    .yellow()
                    .bold(),
                synthesis.recommendation
            ));
        } else if let Some(error) = &result.synthesis_error {
            output.push_str(&Self::section_header("Chairman's Recommendation"));
            output.push_str(&format!("\n{} {}\n", "Synthesis failed:".red().bold(), error));
        }

        output.push_str(&Self::footer(result.stage));

        output
    }

    /// Format as JSON (the same shape the HTTP surface returns)
    pub fn format_json(result: &CouncilResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer(stage: Stage) -> String {
        let status = match stage {
            Stage::OpinionsCollected => "Council opinions collected".green(),
            Stage::Synthesized => "Council complete".green(),
        };
        format!("\n{}\n{}\n", "=".repeat(60).cyan(), status)
    }
}
