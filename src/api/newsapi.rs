use crate::error::{Error, Result};
use crate::models::ai::NewsItem;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const API_BASE_URL: &str = "https://newsapi.org/v2";
const NEWS_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_QUERY: &str = "finance OR cryptocurrency OR stock market";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize, Default)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<String>,
    #[serde(default)]
    source: ArticleSource,
}

#[derive(Debug, Deserialize, Default)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
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

    /// Financial news search, newest first. An empty query falls back to a
    /// broad finance filter.
    pub async fn everything(&self, query: &str, limit: usize) -> Result<Vec<NewsItem>> {
        let q = if query.is_empty() { DEFAULT_QUERY } else { query };
        let url = format!("{}/everything", self.base_url);
        let page_size = limit.to_string();
        let response = self
            .client
            .get(&url)
            .timeout(NEWS_TIMEOUT)
            .query(&[
                ("q", q),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiError(format!(
                "News request failed with status: {}",
                status
            )));
        }

        let data: EverythingResponse = response.json().await?;
        if data.status != "ok" {
            return Err(Error::ApiError(format!(
                "News provider answered with status: {}",
                data.status
            )));
        }

        Ok(data
            .articles
            .into_iter()
            .take(limit)
            .map(|article| NewsItem {
                title: article.title.unwrap_or_default(),
                description: article.description.unwrap_or_default(),
                url: article.url.unwrap_or_default(),
                published_at: article.published_at.unwrap_or_default(),
                source: article.source.name.unwrap_or_default(),
            })
            .collect())
    }
}
