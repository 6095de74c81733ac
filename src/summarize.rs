//! Summarization strategies over the model client.
//!
//! Two strategies exist and stay independently testable:
//!
//! - **Per-article**: one model call per article asking for Markdown
//!   bullets. An empty or refused response is re-asked exactly once with a
//!   reduced prompt built from the title and feed summary only, never the
//!   full text. A call error degrades to an inline failure note so one bad
//!   article never sinks the run.
//! - **Daily brief**: a single model call across every fetched article,
//!   asking for cross-source synthesis rather than per-article recaps. A
//!   failure here drops the whole report; there is no per-article fallback.
//!
//! Text fed to the model is truncated to a fixed character budget per
//! strategy to bound request size.

use crate::api::GenerateText;
use crate::models::{Article, ContentBlock};
use crate::utils::{truncate_chars, truncate_for_log};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Character budget for a single article's text in per-article mode.
pub const ARTICLE_CHAR_BUDGET: usize = 30_000;

/// Character budget per item when merging the daily-brief corpus.
pub const BRIEF_ITEM_CHAR_BUDGET: usize = 6_000;

/// Fixed delay between consecutive per-article model calls, to stay under
/// the endpoint's request-per-minute limit.
pub const SUMMARY_PACING: Duration = Duration::from_secs(2);

/// Response fragments that indicate the model declined to summarize.
const REFUSAL_MARKERS: &[&str] = &[
    "I cannot",
    "I can't",
    "I am unable",
    "I'm unable",
    "cannot assist",
    "can't assist",
    "cannot help with",
];

/// Whether a response warrants the single reduced re-prompt: it is empty or
/// carries a known refusal marker.
pub fn needs_reduced_retry(response: &str) -> bool {
    let trimmed = response.trim();
    trimmed.is_empty() || REFUSAL_MARKERS.iter().any(|m| trimmed.contains(m))
}

fn article_prompt(article: &Article, text: &str) -> String {
    format!(
        "You are an AI industry analyst. Summarize the article below as \
Markdown bullet points covering: the core point, the key techniques or \
methods involved, and the likely impact. Keep it under eight bullets and \
do not use code fences.\n\n\
Title: {}\n\
Source: {}\n\
Content:\n{}",
        article.title,
        article.source,
        truncate_chars(text, ARTICLE_CHAR_BUDGET)
    )
}

fn reduced_prompt(article: &Article) -> String {
    format!(
        "You are an AI industry analyst. Based only on the title and feed \
summary below, write a short Markdown bullet summary of what this article \
most likely covers and why it matters. Do not use code fences.\n\n\
Title: {}\n\
Source: {}\n\
Feed summary: {}",
        article.title,
        article.source,
        article.summary.as_deref().unwrap_or("(none provided)")
    )
}

/// Summarize one article, with the single reduced re-prompt on refusal.
///
/// Never fails: a model error produces an inline failure note carrying the
/// title and error text.
#[instrument(level = "info", skip_all, fields(title = %article.title))]
pub async fn summarize_article<G: GenerateText>(model: &G, article: &Article, text: &str) -> String {
    match model.generate(&article_prompt(article, text)).await {
        Ok(response) if needs_reduced_retry(&response) => {
            warn!(
                response_preview = %truncate_for_log(&response, 200),
                "Response empty or refused; re-asking from title and summary"
            );
            match model.generate(&reduced_prompt(article)).await {
                Ok(retry) => retry,
                Err(e) => failure_note(article, &e.to_string()),
            }
        }
        Ok(response) => response,
        Err(e) => failure_note(article, &e.to_string()),
    }
}

fn failure_note(article: &Article, error: &str) -> String {
    format!("- Summary unavailable for \"{}\": {}", article.title, error)
}

/// Render per-article summaries into one Markdown report.
pub fn render_sections(sections: &[(Article, String)]) -> String {
    let mut report = String::from("# AI Daily Brief\n");
    for (article, summary) in sections {
        report.push_str(&format!(
            "\n## [{}]({}) ({})\n\n{}\n",
            article.title, article.url, article.source, summary
        ));
    }
    report
}

/// Merge the fetched articles into the daily-brief corpus.
///
/// Each item contributes a `[source] title / link / content` block with its
/// text truncated to [`BRIEF_ITEM_CHAR_BUDGET`]. Forbidden articles were
/// already excluded before the blocks were built.
fn merge_blocks(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(|block| {
            format!(
                "[{}] {}\nLink: {}\nContent:\n{}",
                block.article.source,
                block.article.title,
                block.article.url,
                truncate_chars(&block.text, BRIEF_ITEM_CHAR_BUDGET)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn brief_prompt(blocks: &[ContentBlock]) -> String {
    format!(
        "You are an AI industry intelligence analyst. Using the articles \
below, produce today's brief. Do not recap each article one by one; distill \
cross-source trends and shared signals.\n\n\
---\n\
Material ({} articles):\n\
{}\n\n\
---\n\
Output strict Markdown (no code fences), structured as:\n\n\
# AI Daily Brief\n\
## Top Stories\n\
- (3-6 bullets, aggregated across sources)\n\n\
## Company Updates\n\
- **Company**: 1-2 sentences on the key update\n\n\
## Trends\n\
- (3-5 trend insights, emphasizing what changed and its impact)\n\n\
## Article Index\n\
- [title](link) - source",
        blocks.len(),
        merge_blocks(blocks)
    )
}

/// Produce the unified daily brief from all fetched articles.
///
/// Returns `None` when there is nothing to summarize or when the model call
/// fails; the caller publishes the quiet-day placeholder in that case.
#[instrument(level = "info", skip_all, fields(articles = blocks.len()))]
pub async fn summarize_daily_brief<G: GenerateText>(
    model: &G,
    blocks: &[ContentBlock],
) -> Option<String> {
    if blocks.is_empty() {
        info!("No article content survived fetching; skipping model call");
        return None;
    }

    match model.generate(&brief_prompt(blocks)).await {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(error = %e, "Daily brief call failed; dropping report");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::error::Error;

    /// Scripted [`GenerateText`] fake: pops canned results in order and
    /// records every prompt it saw.
    struct ScriptedModel {
        responses: RefCell<Vec<Result<String, String>>>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<String, String>>) -> Self {
            Self {
                responses: RefCell::new(responses),
                prompts: RefCell::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.borrow().clone()
        }
    }

    impl GenerateText for ScriptedModel {
        async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
            self.prompts.borrow_mut().push(prompt.to_string());
            let mut responses = self.responses.borrow_mut();
            assert!(!responses.is_empty(), "unexpected extra model call");
            responses.remove(0).map_err(|e| e.into())
        }
    }

    fn article() -> Article {
        Article {
            title: "New Model Released".to_string(),
            url: "https://example.com/new-model".to_string(),
            source: "Example Lab".to_string(),
            published: Utc.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap(),
            summary: Some("A lab released a model".to_string()),
        }
    }

    fn block(text: &str) -> ContentBlock {
        ContentBlock {
            article: article(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_refusal_detection() {
        assert!(needs_reduced_retry(""));
        assert!(needs_reduced_retry("   \n"));
        assert!(needs_reduced_retry("I cannot summarize this content."));
        assert!(needs_reduced_retry("Sorry, I'm unable to help here."));
        assert!(!needs_reduced_retry("- The lab shipped a new model"));
    }

    #[tokio::test]
    async fn test_clean_response_passes_through() {
        let model = ScriptedModel::new(vec![Ok("- a fine summary".to_string())]);
        let out = summarize_article(&model, &article(), "full text").await;
        assert_eq!(out, "- a fine summary");
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_refusal_triggers_exactly_one_reduced_retry() {
        let model = ScriptedModel::new(vec![
            Ok("I cannot summarize this.".to_string()),
            Ok("- reduced summary".to_string()),
        ]);
        let out = summarize_article(&model, &article(), "full text").await;
        assert_eq!(out, "- reduced summary");

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        // The retry prompt carries the title and feed summary but never the
        // full article text.
        assert!(prompts[1].contains("New Model Released"));
        assert!(prompts[1].contains("A lab released a model"));
        assert!(!prompts[1].contains("full text"));
    }

    #[tokio::test]
    async fn test_empty_response_triggers_retry() {
        let model = ScriptedModel::new(vec![
            Ok(String::new()),
            Ok("- reduced summary".to_string()),
        ]);
        let out = summarize_article(&model, &article(), "full text").await;
        assert_eq!(out, "- reduced summary");
    }

    #[tokio::test]
    async fn test_call_error_becomes_inline_failure_note() {
        let model = ScriptedModel::new(vec![Err("quota exceeded".to_string())]);
        let out = summarize_article(&model, &article(), "full text").await;
        assert!(out.contains("Summary unavailable"));
        assert!(out.contains("New Model Released"));
        assert!(out.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_article_text_is_truncated_to_budget() {
        let model = ScriptedModel::new(vec![Ok("- ok".to_string())]);
        let long_text = "x".repeat(ARTICLE_CHAR_BUDGET + 5_000);
        summarize_article(&model, &article(), &long_text).await;
        let prompt = model.prompts().remove(0);
        assert!(prompt.len() < long_text.len());
        assert!(prompt.contains(&"x".repeat(100)));
    }

    #[test]
    fn test_render_sections_links_each_article() {
        let report = render_sections(&[(article(), "- point one".to_string())]);
        assert!(report.starts_with("# AI Daily Brief"));
        assert!(report.contains("[New Model Released](https://example.com/new-model)"));
        assert!(report.contains("Example Lab"));
        assert!(report.contains("- point one"));
    }

    #[tokio::test]
    async fn test_daily_brief_merges_all_blocks() {
        let model = ScriptedModel::new(vec![Ok("# AI Daily Brief\n...".to_string())]);
        let blocks = vec![block("first body"), block("second body")];
        let report = summarize_daily_brief(&model, &blocks).await;
        assert!(report.is_some());

        let prompt = model.prompts().remove(0);
        assert!(prompt.contains("2 articles"));
        assert!(prompt.contains("first body"));
        assert!(prompt.contains("second body"));
        assert!(prompt.contains("[Example Lab] New Model Released"));
        assert!(prompt.contains("Link: https://example.com/new-model"));
    }

    #[tokio::test]
    async fn test_daily_brief_truncates_each_item() {
        let model = ScriptedModel::new(vec![Ok("ok".to_string())]);
        let long = "y".repeat(BRIEF_ITEM_CHAR_BUDGET + 4_000);
        summarize_daily_brief(&model, &[block(&long)]).await;
        let prompt = model.prompts().remove(0);
        assert!(prompt.len() < long.len() + 2_000);
    }

    #[tokio::test]
    async fn test_daily_brief_failure_drops_report() {
        let model = ScriptedModel::new(vec![Err("backend overloaded".to_string())]);
        let report = summarize_daily_brief(&model, &[block("body")]).await;
        assert!(report.is_none());
    }

    #[tokio::test]
    async fn test_daily_brief_empty_input_skips_model_call() {
        let model = ScriptedModel::new(vec![]);
        let report = summarize_daily_brief(&model, &[]).await;
        assert!(report.is_none());
        assert!(model.prompts().is_empty());
    }
}
