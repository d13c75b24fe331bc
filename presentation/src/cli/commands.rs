//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for `ask`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted opinions and recommendation
    Full,
    /// JSON output (same shape as the HTTP response)
    Json,
}

/// CLI arguments for chairman-council
#[derive(Parser, Debug)]
#[command(name = "chairman-council")]
#[command(author, version, about = "Chairman's Council - a multi-model advisory council for healthcare organizations")]
#[command(long_about = r#"
Chairman's Council puts one question to a fixed council of model personas in
parallel and returns every member's opinion, optionally followed by a
chairman's consolidated recommendation.

Configuration is loaded from (in priority order):
1. COUNCIL_* environment variables (e.g. COUNCIL_SERVER__PORT=9000)
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/chairman-council/config.toml   Global config

The provider API key is read from $OPENROUTER_API_KEY unless
[provider].api_key is set.

Example:
  chairman-council serve --port 8000
  chairman-council ask "How should we triage after-hours calls?"
  chairman-council ask --synthesize --output json "..."
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeArgs),
    /// Put one question to the council from the terminal (no authentication)
    Ask(AskArgs),
    /// Show configuration sources and the effective configuration
    ShowConfig,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override [server].host
    #[arg(long)]
    pub host: Option<String>,

    /// Override [server].port
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to put to the council
    pub query: String,

    /// Run the chairman synthesis stage
    #[arg(short, long)]
    pub synthesize: bool,

    /// Use the member models of this specialty (e.g. psychiatry)
    #[arg(long, value_name = "NAME")]
    pub specialty: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}
