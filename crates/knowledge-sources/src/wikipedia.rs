//! Wikipedia page summaries over the public REST API.

use crate::error::Result;
use crate::{first_sentences, KnowledgeError, Summarizer};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("voice-assistant/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Map a locale such as `en-US` to a Wikipedia subdomain such as `en`.
pub fn wiki_language(locale: &str) -> String {
    let lang: String = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
        "en".to_string()
    } else {
        lang
    }
}

pub struct WikipediaSummarizer {
    client: Client,
    base_url: String,
}

impl WikipediaSummarizer {
    pub fn new(locale: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| KnowledgeError::Unavailable(format!("http client: {e}")))?;
        let base_url = format!(
            "https://{}.wikipedia.org/api/rest_v1/page/summary/",
            wiki_language(locale)
        );
        info!("Wikipedia summaries from {}", base_url);
        Ok(Self { client, base_url })
    }

    fn page_url(&self, topic: &str) -> String {
        let title = topic.trim().replace(' ', "_");
        format!("{}{}", self.base_url, urlencoding::encode(&title))
    }
}

impl Summarizer for WikipediaSummarizer {
    fn summarize(&self, topic: &str, sentences: usize) -> Result<String> {
        if topic.trim().is_empty() {
            return Err(KnowledgeError::NotFound);
        }
        let url = self.page_url(topic);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| KnowledgeError::Unavailable(e.to_string()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => return Err(KnowledgeError::NotFound),
            status if !status.is_success() => {
                warn!("Wikipedia returned {} for '{}'", status, topic);
                return Err(KnowledgeError::Unavailable(format!("HTTP {status}")));
            }
            _ => {}
        }

        let body: SummaryResponse = resp
            .json()
            .map_err(|e| KnowledgeError::Unavailable(format!("bad summary payload: {e}")))?;

        if body.kind == "disambiguation" {
            return Err(KnowledgeError::Ambiguous);
        }
        if body.extract.trim().is_empty() {
            return Err(KnowledgeError::NotFound);
        }
        Ok(first_sentences(&body.extract, sentences))
    }
}
