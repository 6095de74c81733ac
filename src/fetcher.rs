//! Article content fetching with tiered fallback.
//!
//! Full text is requested through a readability proxy first, then directly
//! from the origin site, then degrades to the feed-provided summary and
//! finally to a fixed placeholder. A 403 from either the proxy or the origin
//! is a hard block: the article is marked [`FetchOutcome::Forbidden`] and no
//! further tiers are tried.
//!
//! The HTTP seam is the [`FetchPage`] trait so the tier policy is testable
//! against scripted responses.

use crate::models::FetchOutcome;
use reqwest::header::REFERER;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Readability proxy endpoint; the target URL is appended as-is.
pub const READABILITY_PROXY: &str = "https://r.jina.ai/";

/// Placeholder body used when every tier failed and no feed summary exists.
pub const BODY_UNAVAILABLE: &str =
    "(Article body unavailable; summarize from the title alone.)";

/// Per-request timeout for proxy and direct fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Browser-like user agent; some origins reject default client strings.
const FETCH_USER_AGENT: &str = "Mozilla/5.0 (compatible; AINewsBot/1.0)";

/// A fetched page: status code plus body text.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

/// Minimal HTTP GET seam used by the fetcher.
///
/// The real implementation wraps `reqwest`; tests substitute scripted fakes
/// so the tier policy runs against deterministic responses.
pub trait FetchPage {
    async fn get(&self, url: &str, referer: &str) -> Result<PageResponse, Box<dyn Error>>;
}

/// [`FetchPage`] implementation over a shared `reqwest` client.
#[derive(Debug)]
pub struct HttpFetch {
    client: reqwest::Client,
}

impl HttpFetch {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(FETCH_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetch {
    async fn get(&self, url: &str, referer: &str) -> Result<PageResponse, Box<dyn Error>> {
        let response = self.client.get(url).header(REFERER, referer).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(PageResponse { status, body })
    }
}

/// Fetch an article's text, degrading through the fallback tiers.
///
/// Tier order:
/// 1. GET through the readability proxy; 200 with a non-empty body wins.
/// 2. Proxy 403 short-circuits to [`FetchOutcome::Forbidden`].
/// 3. Direct GET of the original URL; 200 with a non-empty body wins,
///    403 short-circuits to `Forbidden`.
/// 4. The feed summary verbatim, if present; otherwise [`BODY_UNAVAILABLE`].
///
/// Transport errors at any tier are swallowed and treated as a miss.
#[instrument(level = "info", skip_all, fields(url = %article_url))]
pub async fn fetch_content<F: FetchPage>(
    pages: &F,
    article_url: &str,
    fallback_summary: Option<&str>,
) -> FetchOutcome {
    let proxy_url = format!("{READABILITY_PROXY}{article_url}");
    match pages.get(&proxy_url, article_url).await {
        Ok(resp) if resp.status == 200 && !resp.body.trim().is_empty() => {
            debug!(bytes = resp.body.len(), "Readability proxy hit");
            return FetchOutcome::Extracted(resp.body);
        }
        Ok(resp) if resp.status == 403 => {
            warn!("Readability proxy returned 403; marking forbidden");
            return FetchOutcome::Forbidden;
        }
        Ok(resp) => {
            debug!(status = resp.status, "Readability proxy miss");
        }
        Err(e) => {
            debug!(error = %e, "Readability proxy unreachable");
        }
    }

    match pages.get(article_url, article_url).await {
        Ok(resp) if resp.status == 200 && !resp.body.trim().is_empty() => {
            debug!(bytes = resp.body.len(), "Direct fetch hit");
            return FetchOutcome::Extracted(resp.body);
        }
        Ok(resp) if resp.status == 403 => {
            warn!("Origin returned 403; marking forbidden");
            return FetchOutcome::Forbidden;
        }
        Ok(resp) => {
            debug!(status = resp.status, "Direct fetch miss");
        }
        Err(e) => {
            debug!(error = %e, "Direct fetch failed");
        }
    }

    match fallback_summary {
        Some(summary) if !summary.is_empty() => {
            debug!("Falling back to feed summary");
            FetchOutcome::Fallback(summary.to_string())
        }
        _ => {
            debug!("No content at any tier; using placeholder");
            FetchOutcome::Fallback(BODY_UNAVAILABLE.to_string())
        }
    }
}
