use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const API_BASE_URL: &str = "https://api.aimlapi.com/v1";
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(15);
const MODEL: &str = "gpt-4";
const MAX_TOKENS: u32 = 1500;
/// Low randomness; answers should favor determinism and factuality.
const TEMPERATURE: f64 = 0.3;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CompletionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, API_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: super::http_client(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// One system/user completion round-trip. `Ok(None)` means the provider
    /// answered successfully but returned no choices.
    pub async fn complete(&self, system: &str, user: &str) -> Result<Option<String>> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(&url)
            .timeout(COMPLETION_TIMEOUT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiError(format!(
                "Completion request failed with status: {}",
                status
            )));
        }

        let data: CompletionResponse = response.json().await?;
        Ok(data.choices.into_iter().next().map(|c| c.message.content))
    }
}
