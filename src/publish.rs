//! Digest delivery: wrap the report in a chat card and post it.
//!
//! The webhook expects an interactive-card payload: a dated header, one
//! markdown element carrying the digest body, and a note element with a
//! footer line. When no webhook is configured the body is printed to stdout
//! instead and no HTTP call happens. Delivery is a single POST with no
//! retry; a delivery error propagates to the caller.

use reqwest::Client;
use serde::Serialize;
use std::error::Error;
use tracing::{info, instrument};

/// Body used when the report is absent or empty.
pub const QUIET_DAY: &str = "A quiet day on the AI frontier. No major releases to report.";

const FOOTER_NOTE: &str = "Powered by Gemini";

/// Top-level webhook payload.
#[derive(Debug, Serialize)]
pub struct CardMessage {
    msg_type: String,
    card: Card,
}

#[derive(Debug, Serialize)]
struct Card {
    header: CardHeader,
    elements: Vec<CardElement>,
}

#[derive(Debug, Serialize)]
struct CardHeader {
    template: String,
    title: CardTitle,
}

#[derive(Debug, Serialize)]
struct CardTitle {
    content: String,
    tag: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
enum CardElement {
    Markdown { content: String },
    Note { elements: Vec<NoteElement> },
}

#[derive(Debug, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
enum NoteElement {
    PlainText { content: String },
}

/// Build the card payload for a report.
///
/// An absent or empty report becomes the [`QUIET_DAY`] body so the channel
/// still hears from the pipeline on slow days.
pub fn build_card(report: Option<&str>, date: &str) -> CardMessage {
    let body = match report.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => QUIET_DAY.to_string(),
    };

    CardMessage {
        msg_type: "interactive".to_string(),
        card: Card {
            header: CardHeader {
                template: "blue".to_string(),
                title: CardTitle {
                    content: format!("🚀 AI Daily Brief ({date})"),
                    tag: "plain_text".to_string(),
                },
            },
            elements: vec![
                CardElement::Markdown { content: body },
                CardElement::Note {
                    elements: vec![NoteElement::PlainText {
                        content: FOOTER_NOTE.to_string(),
                    }],
                },
            ],
        },
    }
}

/// Deliver the report: POST the card to the webhook, or print the body when
/// no webhook is configured.
#[instrument(level = "info", skip_all, fields(has_webhook = webhook_url.is_some()))]
pub async fn publish(
    client: &Client,
    webhook_url: Option<&str>,
    report: Option<String>,
    date: &str,
) -> Result<(), Box<dyn Error>> {
    let Some(url) = webhook_url else {
        info!("No webhook configured; printing digest to stdout");
        println!("{}", report.as_deref().unwrap_or(QUIET_DAY));
        return Ok(());
    };

    let card = build_card(report.as_deref(), date);
    client
        .post(url)
        .json(&card)
        .send()
        .await?
        .error_for_status()?;
    info!("Digest posted to webhook");
    Ok(())
}
