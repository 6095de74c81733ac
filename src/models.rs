//! Data models for collected articles and their fetched content.
//!
//! This module defines the core data structures passed between pipeline
//! stages:
//! - [`FeedSource`]: A named feed endpoint to poll
//! - [`Article`]: A normalized feed entry from the last 24 hours
//! - [`FetchOutcome`]: Tri-state result of the content fetcher
//! - [`ContentBlock`]: An article paired with its fetched text, ready for
//!   summarization
//!
//! Nothing here is persisted; every value is created during a run and
//! discarded at process exit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named feed endpoint.
///
/// The built-in source list covers the major AI-industry blogs; it can be
/// replaced at startup with a YAML file of `{name, url}` pairs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedSource {
    /// Human-readable source name, used in logs and the digest.
    pub name: String,
    /// The RSS/Atom feed URL.
    pub url: String,
}

impl FeedSource {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// A feed entry published within the collection window, normalized for the
/// rest of the pipeline.
///
/// Created by the collector; read-only afterward.
#[derive(Debug, Clone)]
pub struct Article {
    /// The entry title, or "(untitled)" when the feed omitted one.
    pub title: String,
    /// The entry link. Entries without a link are never collected.
    pub url: String,
    /// The name of the [`FeedSource`] the entry came from.
    pub source: String,
    /// Publication timestamp, taken from the entry's published field or,
    /// failing that, its updated field.
    pub published: DateTime<Utc>,
    /// The feed-provided summary with HTML stripped, if any. Used as a
    /// fetch fallback and for reduced re-prompts.
    pub summary: Option<String>,
}

/// Result of attempting to fetch an article's full text.
///
/// The fetcher degrades through tiers (readability proxy, direct GET, feed
/// summary, placeholder) and reports which class of text it ended up with.
/// `Forbidden` is a hard signal: a 403 from the proxy or the origin means
/// the article is excluded from summarization entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Full text retrieved from the readability proxy or the origin site.
    Extracted(String),
    /// No body could be retrieved; carrying the feed summary or the fixed
    /// placeholder instead.
    Fallback(String),
    /// The proxy or the origin answered 403. Do not summarize this article.
    Forbidden,
}

impl FetchOutcome {
    /// The usable text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            FetchOutcome::Extracted(t) | FetchOutcome::Fallback(t) => Some(t),
            FetchOutcome::Forbidden => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, FetchOutcome::Forbidden)
    }
}

/// An article paired with the text the fetcher produced for it.
///
/// Ephemeral: built after the fetch stage, consumed immediately by the
/// summarizer. Truncation to the per-mode character budget happens at
/// consumption time, not here.
#[derive(Debug, Clone)]
pub struct ContentBlock {
    pub article: Article,
    pub text: String,
}
