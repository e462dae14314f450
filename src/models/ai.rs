use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A source citation attached to an AI answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
}

/// A numbered web-search result used while building context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSource {
    pub id: usize,
    pub title: String,
    pub url: String,
}

/// Web-search output: the formatted context blob fed to the completion
/// provider plus the parallel source list used for citations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResults {
    pub context: String,
    pub sources: Vec<SearchSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnswer {
    pub response: String,
    pub sources: Vec<SourceRef>,
    /// Wall-clock seconds from request start to completion receipt.
    pub response_time: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub source: String,
}
