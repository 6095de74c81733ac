//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can be provided via a command-line flag or an environment
//! variable, so the binary runs unattended from cron or CI with nothing but
//! the environment configured.

use clap::{Parser, ValueEnum};

/// Which summarization strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryMode {
    /// One model call across all articles, producing a unified daily brief.
    DailyBrief,
    /// One model call per article, concatenated into a single report.
    PerArticle,
}

/// Command-line arguments for the AI daily brief pipeline.
///
/// # Examples
///
/// ```sh
/// # Typical CI invocation: everything from the environment
/// GEMINI_API_KEY=... FEISHU_WEBHOOK=... ai_daily_brief
///
/// # Dry run to the console with a custom source list
/// GEMINI_API_KEY=... ai_daily_brief --sources ./sources.yaml
///
/// # Per-article summaries instead of the unified brief
/// GEMINI_API_KEY=... ai_daily_brief --mode per-article
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Chat webhook URL; when absent, the digest is printed to stdout
    #[arg(long, env = "FEISHU_WEBHOOK")]
    pub webhook_url: Option<String>,

    /// Gemini API key (required before any network activity starts)
    #[arg(long, env = "GEMINI_API_KEY")]
    pub api_key: Option<String>,

    /// Model name override
    #[arg(long, env = "MODEL_NAME", default_value = "gemini-2.5-flash")]
    pub model: String,

    /// Summarization strategy
    #[arg(long, value_enum, default_value = "daily-brief")]
    pub mode: SummaryMode,

    /// Optional path to a YAML file of {name, url} feed sources,
    /// replacing the built-in list
    #[arg(short, long)]
    pub sources: Option<String>,

    /// Collection window in hours; entries older than this are skipped
    #[arg(long, default_value_t = 24)]
    pub window_hours: i64,
}
