//! Runtime configuration assembled once at startup.
//!
//! All knobs (webhook, API key, model, mode, source list, window) are
//! resolved from the CLI/environment into a single [`Config`] value that is
//! passed by reference into each pipeline stage. No stage reads the
//! environment or any other process-global state on its own.

use crate::cli::{Cli, SummaryMode};
use crate::models::FeedSource;
use chrono::Duration;
use once_cell::sync::Lazy;
use std::error::Error;
use std::fs;
use tracing::info;

/// The built-in list of AI-industry feed sources.
static DEFAULT_SOURCES: Lazy<Vec<FeedSource>> = Lazy::new(|| {
    vec![
        FeedSource::new("OpenAI", "https://openai.com/news/rss.xml"),
        FeedSource::new("Anthropic", "https://www.anthropic.com/feed"),
        FeedSource::new("Google DeepMind", "https://deepmind.google/blog/rss.xml"),
        FeedSource::new("Hugging Face", "https://huggingface.co/blog/feed.xml"),
        FeedSource::new("Meta AI", "https://ai.meta.com/blog/rss.xml"),
        FeedSource::new("LangChain", "https://blog.langchain.dev/rss/"),
        FeedSource::new(
            "Microsoft Research",
            "https://www.microsoft.com/en-us/research/feed/",
        ),
        FeedSource::new(
            "Apple Machine Learning",
            "https://machinelearning.apple.com/rss.xml",
        ),
        FeedSource::new(
            "AWS Machine Learning",
            "https://aws.amazon.com/blogs/machine-learning/feed/",
        ),
        FeedSource::new("Google AI Blog", "https://ai.googleblog.com/feeds/posts/default"),
        FeedSource::new("OpenAI Research (arXiv)", "https://export.arxiv.org/rss/cs.AI"),
        FeedSource::new("Machine Learning (arXiv)", "https://export.arxiv.org/rss/cs.LG"),
        FeedSource::new("Papers With Code", "https://paperswithcode.com/rss"),
        FeedSource::new("Alibaba Cloud Blog", "https://www.alibabacloud.com/blog/feed"),
        FeedSource::new("Alibaba Developer Blog", "https://developer.aliyun.com/rss.xml"),
        FeedSource::new(
            "Tencent Cloud Developer",
            "https://cloud.tencent.com/developer/rss",
        ),
        FeedSource::new("Tencent Open Source", "https://opensource.tencent.com/feed"),
        FeedSource::new(
            "Huawei Developer Blog",
            "https://developer.huawei.com/ict/en/blog/rss",
        ),
    ]
});

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat webhook endpoint. `None` degrades the publisher to stdout.
    pub webhook_url: Option<String>,
    /// Gemini API key. Its absence is the one fatal configuration error.
    pub api_key: String,
    /// Model name passed to the completion endpoint.
    pub model: String,
    /// Which summarization strategy to run.
    pub mode: SummaryMode,
    /// Feed sources to poll, in order.
    pub sources: Vec<FeedSource>,
    /// Trailing collection window.
    pub window: Duration,
}

impl Config {
    /// Build the configuration from parsed CLI arguments.
    ///
    /// Fails fast when the API key is missing, before any network activity,
    /// and when a sources file was named but cannot be read or parsed.
    pub fn from_cli(cli: Cli) -> Result<Self, Box<dyn Error>> {
        let api_key = cli.api_key.filter(|k| !k.is_empty()).ok_or(
            "GEMINI_API_KEY is not set; provide it via the environment or --api-key",
        )?;

        let sources = match cli.sources.as_deref() {
            Some(path) => load_sources(path)?,
            None => DEFAULT_SOURCES.clone(),
        };

        Ok(Self {
            webhook_url: cli.webhook_url.filter(|u| !u.is_empty()),
            api_key,
            model: cli.model,
            mode: cli.mode,
            sources,
            window: Duration::hours(cli.window_hours),
        })
    }
}

/// Load a replacement source list from a YAML file.
///
/// The file is a sequence of `{name, url}` mappings. An empty list is
/// rejected; a run with nothing to poll is a configuration mistake.
pub fn load_sources(path: &str) -> Result<Vec<FeedSource>, Box<dyn Error>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("failed to read sources file {path}: {e}"))?;
    let sources: Vec<FeedSource> = serde_yaml::from_str(&raw)
        .map_err(|e| format!("failed to parse sources file {path}: {e}"))?;
    if sources.is_empty() {
        return Err(format!("sources file {path} contains no sources").into());
    }
    info!(count = sources.len(), path, "Loaded feed sources from file");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_key() -> Cli {
        Cli {
            webhook_url: None,
            api_key: Some("test-key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            mode: SummaryMode::DailyBrief,
            sources: None,
            window_hours: 24,
        }
    }

    #[test]
    fn test_default_sources_nonempty_and_named() {
        assert_eq!(DEFAULT_SOURCES.len(), 18);
        assert!(DEFAULT_SOURCES.iter().all(|s| !s.name.is_empty()));
        assert!(DEFAULT_SOURCES.iter().all(|s| s.url.starts_with("http")));
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let mut cli = cli_with_key();
        cli.api_key = None;
        let err = Config::from_cli(cli).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_empty_api_key_is_fatal() {
        let mut cli = cli_with_key();
        cli.api_key = Some(String::new());
        assert!(Config::from_cli(cli).is_err());
    }

    #[test]
    fn test_config_defaults_to_builtin_sources() {
        let config = Config::from_cli(cli_with_key()).unwrap();
        assert_eq!(config.sources.len(), DEFAULT_SOURCES.len());
        assert_eq!(config.window, Duration::hours(24));
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_empty_webhook_treated_as_unset() {
        let mut cli = cli_with_key();
        cli.webhook_url = Some(String::new());
        let config = Config::from_cli(cli).unwrap();
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_load_sources_from_yaml_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("ai_daily_brief_sources_test.yaml");
        fs::write(
            &path,
            "- name: OpenAI\n  url: https://openai.com/news/rss.xml\n",
        )
        .unwrap();
        let sources = load_sources(path.to_str().unwrap()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "OpenAI");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_sources_missing_file() {
        assert!(load_sources("/nonexistent/sources.yaml").is_err());
    }

    #[test]
    fn test_load_sources_rejects_empty_list() {
        let dir = std::env::temp_dir();
        let path = dir.join("ai_daily_brief_sources_empty.yaml");
        fs::write(&path, "[]\n").unwrap();
        assert!(load_sources(path.to_str().unwrap()).is_err());
        let _ = fs::remove_file(&path);
    }
}
