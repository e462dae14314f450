use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const API_BASE_URL: &str = "https://google.serper.dev";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct SerperClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SerperClient {
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

    /// Keyword web search returning the top organic results.
    pub async fn search(&self, query: &str, num: usize) -> Result<Vec<OrganicResult>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(SEARCH_TIMEOUT)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query, "num": num }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiError(format!(
                "Serper search failed with status: {}",
                status
            )));
        }

        let data: SearchResponse = response.json().await?;
        Ok(data.organic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_returns_organic_results_in_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .match_header("x-api-key", "k")
            .with_status(200)
            .with_body(
                r#"{"organic": [
                    {"title": "First", "snippet": "s1", "link": "https://a"},
                    {"title": "Second", "snippet": "s2", "link": "https://b"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = SerperClient::with_base_url("k", server.url());
        let results = client.search("finance bitcoin", 3).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First");
        assert_eq!(results[1].link, "https://b");
    }

    #[tokio::test]
    async fn missing_organic_section_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(200)
            .with_body(r#"{"searchParameters": {}}"#)
            .create_async()
            .await;

        let client = SerperClient::with_base_url("k", server.url());
        assert!(client.search("anything", 3).await.unwrap().is_empty());
    }
}
