//! Feed collection: poll the configured sources and keep recent entries.
//!
//! Each source is fetched and parsed in turn. A failing source (network
//! error, bad status, unparseable XML) is logged and skipped; one broken
//! feed never aborts the run. Entries qualify when they carry a publish or
//! update timestamp inside the trailing collection window and a link.
//!
//! Output order is feed iteration order, not global time order, matching
//! what downstream prompts expect.

use crate::models::{Article, FeedSource};
use crate::utils::html_to_text;
use chrono::{DateTime, Duration, Utc};
use feed_rs::model::Feed;
use feed_rs::parser;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Collect all articles published within `window` of `now` across the
/// configured sources.
///
/// Sources are polled one at a time. `now` is passed in rather than read
/// from the clock so the window edge is fixed for the whole run.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn collect_recent(
    client: &Client,
    sources: &[FeedSource],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<Article> {
    let cutoff = now - window;

    let per_source: Vec<Vec<Article>> = stream::iter(sources)
        .then(|source| async move {
            debug!(source = %source.name, url = %source.url, "Checking feed");
            match fetch_feed(client, &source.url).await {
                Ok(feed) => {
                    let articles = articles_from_feed(&feed, &source.name, cutoff);
                    if !articles.is_empty() {
                        info!(
                            source = %source.name,
                            count = articles.len(),
                            "Found new articles"
                        );
                    }
                    articles
                }
                Err(e) => {
                    warn!(source = %source.name, error = %e, "Feed fetch failed; skipping source");
                    Vec::new()
                }
            }
        })
        .collect()
        .await;

    let articles = dedup_by_url(per_source.into_iter().flatten().collect());
    info!(count = articles.len(), "Collected recent articles");
    articles
}

/// Fetch one feed URL and parse it as RSS/Atom.
async fn fetch_feed(client: &Client, url: &str) -> Result<Feed, Box<dyn Error>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("feed fetch failed with status {status}").into());
    }
    let bytes = response.bytes().await?;
    Ok(parser::parse(bytes.as_ref())?)
}

/// Normalize a parsed feed's entries into [`Article`] records.
///
/// The publication timestamp comes from the entry's published field, falling
/// back to updated; entries lacking both are excluded, as are entries with
/// no link and entries at or before the cutoff.
pub fn articles_from_feed(feed: &Feed, source: &str, cutoff: DateTime<Utc>) -> Vec<Article> {
    let mut articles = Vec::new();
    for entry in &feed.entries {
        let Some(published) = entry.published.or(entry.updated) else {
            debug!(source, "Skipping entry without publish or update timestamp");
            continue;
        };
        if published <= cutoff {
            continue;
        }
        let Some(url) = entry.links.first().map(|l| l.href.clone()) else {
            debug!(source, "Skipping entry without a link");
            continue;
        };
        // Some feeds carry relative or malformed hrefs; those articles are
        // unfetchable, so drop them here.
        match Url::parse(&url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                debug!(source, %url, "Skipping entry with unusable link");
                continue;
            }
        }
        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "(untitled)".to_string());
        let summary = entry
            .summary
            .as_ref()
            .map(|t| html_to_text(&t.content))
            .filter(|s| !s.is_empty());

        articles.push(Article {
            title,
            url,
            source: source.to_string(),
            published,
            summary,
        });
    }
    articles
}

/// Drop repeat URLs across sources, keeping the first occurrence.
pub fn dedup_by_url(articles: Vec<Article>) -> Vec<Article> {
    articles
        .into_iter()
        .unique_by(|a| a.url.clone())
        .collect()
}
