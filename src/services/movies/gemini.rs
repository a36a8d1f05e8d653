use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
};

use super::{parse_providers, ProviderLookup};

const PROVIDER_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        Some(text)
    }
}

/// Asks the Gemini text-generation API which OTT platforms carry a title
#[derive(Clone)]
pub struct GeminiProviderLookup {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    cache: Cache,
}

impl GeminiProviderLookup {
    pub fn new(cache: Cache, api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
            cache,
        }
    }

    fn prompt(title: &str) -> String {
        format!(
            "List the OTT streaming platforms where the movie \"{}\" can be watched. \
             Answer with platform names only, separated by commas, without markdown.",
            title
        )
    }

    async fn generate(&self, title: &str) -> AppResult<Vec<String>> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        );

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{ "parts": [{ "text": Self::prompt(title) }] }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated
            .text()
            .ok_or_else(|| AppError::ExternalApi("Gemini returned no candidates".to_string()))?;

        let providers = parse_providers(&text);
        tracing::debug!(title = %title, providers = ?providers, "Provider lookup completed");
        Ok(providers)
    }
}

#[async_trait]
impl ProviderLookup for GeminiProviderLookup {
    async fn providers_for(&self, title: &str) -> AppResult<Vec<String>> {
        cached!(
            self.cache,
            CacheKey::Providers(title.to_string()),
            PROVIDER_CACHE_TTL,
            self.generate(title)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_response_text_joins_parts() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "**Netflix**, " }, { "text": "Prime Video" }] }
            }]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let text = response.text().unwrap();
        assert_eq!(parse_providers(&text), vec!["Netflix", "Prime Video"]);
    }

    #[test]
    fn test_generate_response_without_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_prompt_mentions_title() {
        assert!(GeminiProviderLookup::prompt("Inception").contains("\"Inception\""));
    }
}
