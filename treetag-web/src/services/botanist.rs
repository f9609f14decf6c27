//! AI text-generation client
//!
//! Requests a tree profile from a chat-completions endpoint. The prompt pins
//! the exact ordered section structure that `treetag_common::parse` expects;
//! the two sides are coupled on purpose.

use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use treetag_common::{Error, Result};

const MODEL: &str = "mistralai/mistral-7b-instruct:free";
const MAX_TOKENS: u32 = 700;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

pub struct Botanist {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl Botanist {
    pub fn new(http: reqwest::Client, url: String, api_key: Option<String>) -> Self {
        Self { http, url, api_key }
    }

    /// Fetch the free-text profile for a scientific name
    pub async fn fetch_profile(&self, scientific_name: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("AI service key is not configured".into()))?;

        let body = json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": "You are a helpful botanical expert."},
                {"role": "user", "content": prompt_for(scientific_name)},
            ],
            "max_tokens": MAX_TOKENS,
        });

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Ai(format!("profile request: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Ai(format!("profile request: status {}", resp.status())));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| Error::Ai(format!("profile request: decode: {e}")))?;

        match parsed.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content),
            None => {
                warn!("AI response carried no choices for {scientific_name}");
                Err(Error::Ai("profile request: empty response".into()))
            }
        }
    }
}

/// The fixed prompt the profile parser is coupled to. Section headers here
/// must match `treetag_common::parse` exactly.
fn prompt_for(name: &str) -> String {
    format!(
        "You are a knowledgeable botanical expert. Based only on accurate botanical taxonomy, \
what is the most widely accepted scientific and common name for the plant with the scientific \
name '{name}'? Do not confuse it with similar plants.

Include:
- Common Name:
- Detailed Description: (Provide a comprehensive and detailed paragraph explaining the plant's \
characteristics, appearance, growth behavior, and typical habitat)
- Medicinal Benefits: (Give an in-depth explanation of traditional and modern medicinal uses, \
including any active compounds if known)
- Environmental Benefits: (Provide detailed benefits this plant offers to the ecosystem, such \
as carbon absorption, air purification, soil enrichment, biodiversity support, etc.)
- Native to India: Yes or No
- Scientific Classification:
  - Kingdom:
  - Phylum (or Division for plants):
  - Class:
  - Order:
  - Family:
  - Genus:
  - Species:
- Common Tree Category: (Return only one from this list exactly as is, without any extra explanation)
  - Medicinal Trees
  - Fruit-Bearing Trees
  - Timber Trees
  - Ornamental Trees
  - Shade Trees
  - Sacred or Religious Trees
  - Evergreen Trees
  - Deciduous Trees
  - Endangered
  - Rare Trees
  - Others"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_headers_match_parser() {
        let prompt = prompt_for("Ficus benghalensis");
        for header in [
            "Detailed Description:",
            "Medicinal Benefits:",
            "Environmental Benefits:",
            "Native to India:",
            "Scientific Classification:",
            "Common Tree Category:",
        ] {
            assert!(prompt.contains(header), "prompt lost header {header:?}");
        }
        assert!(prompt.contains("Ficus benghalensis"));
    }
}
