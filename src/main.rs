//! # AI Daily Brief
//!
//! A news aggregation and summarization pipeline that collects the last
//! 24 hours of posts from AI-industry blogs and research feeds, fetches
//! article text through a readability proxy, summarizes the day's content
//! with Gemini, and posts the digest as a card to a chat webhook.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... FEISHU_WEBHOOK=... ai_daily_brief
//! ```
//!
//! ## Architecture
//!
//! The application is a linear batch pipeline, run once per invocation
//! (an external cron/CI trigger owns scheduling):
//! 1. **Collect**: poll each configured feed, keep entries from the
//!    trailing window
//! 2. **Fetch**: retrieve article text via the readability proxy with
//!    tiered fallbacks
//! 3. **Summarize**: one batched daily-brief call, or one call per article
//! 4. **Publish**: POST the digest card to the webhook, or print it
//!
//! Every stage runs sequentially; the only pacing is a fixed delay between
//! per-article model calls.

use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod feeds;
mod fetcher;
mod models;
mod publish;
mod summarize;
mod utils;

use api::GeminiClient;
use cli::{Cli, SummaryMode};
use config::Config;
use fetcher::HttpFetch;
use models::{ContentBlock, FetchOutcome};
use summarize::SUMMARY_PACING;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("daily_brief starting up");

    // Parse CLI and resolve configuration; a missing API key fails here,
    // before any network activity.
    let args = Cli::parse();
    let config = match Config::from_cli(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration error");
            return Err(e);
        }
    };
    debug!(
        mode = ?config.mode,
        model = %config.model,
        sources = config.sources.len(),
        has_webhook = config.webhook_url.is_some(),
        "Configuration resolved"
    );

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(20))
        .build()?;

    // ---- Collect recent articles ----
    let articles =
        feeds::collect_recent(&client, &config.sources, Utc::now(), config.window).await;
    if articles.is_empty() {
        info!("No new articles in the window; nothing to publish");
        return Ok(());
    }
    info!(count = articles.len(), "Articles to process");

    // ---- Fetch article content ----
    let pages = HttpFetch::new()?;
    let mut blocks: Vec<ContentBlock> = Vec::new();
    for article in &articles {
        info!(title = %article.title, source = %article.source, "Fetching article");
        match fetcher::fetch_content(&pages, &article.url, article.summary.as_deref()).await {
            FetchOutcome::Forbidden => {
                warn!(title = %article.title, "Content blocked; excluding from digest");
            }
            outcome => {
                if let Some(text) = outcome.text() {
                    blocks.push(ContentBlock {
                        article: article.clone(),
                        text: text.to_string(),
                    });
                }
            }
        }
    }
    info!(
        fetched = blocks.len(),
        excluded = articles.len() - blocks.len(),
        "Content fetching completed"
    );

    // ---- Summarize ----
    let model = GeminiClient::new(&config.api_key, &config.model)?;
    let report = match config.mode {
        SummaryMode::DailyBrief => summarize::summarize_daily_brief(&model, &blocks).await,
        SummaryMode::PerArticle => {
            let mut sections = Vec::new();
            for (i, block) in blocks.iter().enumerate() {
                if i > 0 {
                    sleep(SUMMARY_PACING).await;
                }
                let summary = summarize::summarize_article(&model, &block.article, &block.text).await;
                sections.push((block.article.clone(), summary));
            }
            Some(summarize::render_sections(&sections))
        }
    };

    // ---- Publish ----
    let today = Local::now().format("%Y-%m-%d").to_string();
    publish::publish(&client, config.webhook_url.as_deref(), report, &today).await?;

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
