use crate::api::{content_key, CompletionClient, NewsApiClient, SerperClient};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::models::ai::{AiAnswer, NewsItem, SearchResults, SearchSource, SourceRef};
use crate::services::market::MarketService;
use crate::utils::cache::Cache;
use crate::utils::query;
use chrono::Utc;
use log::{debug, error};
use std::sync::Arc;
use std::time::Instant;

const SYSTEM_PROMPT: &str = "You are a financial research assistant. Provide comprehensive, \
accurate information about finance, investing, stocks, cryptocurrencies, and economics. \
Always cite sources and be transparent about data limitations. Format responses clearly \
with sections and bullet points when appropriate.";

const CONNECTION_APOLOGY: &str =
    "I'm having trouble connecting to the AI service. Please try again later.";
const NO_ANSWER: &str = "I couldn't generate a response. Please try again.";

/// How many search results feed the context and the citation list.
const SEARCH_RESULT_CAP: usize = 3;
/// How many records each market block quotes.
const CONTEXT_RECORD_CAP: usize = 5;

/// Builds query-relevant context from live data and web search, then asks
/// the completion provider. Failures never escape: the worst case is an
/// apologetic answer with no sources.
#[derive(Debug, Clone)]
pub struct AiService {
    market: Arc<MarketService>,
    serper: SerperClient,
    completion: CompletionClient,
    newsapi: NewsApiClient,
    search_cache: Cache<SearchResults>,
    completion_cache: Cache<String>,
    news_cache: Cache<Vec<NewsItem>>,
}

impl AiService {
    pub fn new(
        market: Arc<MarketService>,
        serper: SerperClient,
        completion: CompletionClient,
        newsapi: NewsApiClient,
        cache: &CacheConfig,
    ) -> Self {
        Self {
            market,
            serper,
            completion,
            newsapi,
            search_cache: Cache::new(cache.search_ttl),
            completion_cache: Cache::new(cache.completion_ttl),
            news_cache: Cache::new(cache.news_ttl),
        }
    }

    /// Answer a financial question with live data injected into the prompt.
    pub async fn answer(&self, question: &str) -> AiAnswer {
        let started = Instant::now();

        let search = self.search_context(question).await;
        let market_context = self.market_context(question).await;
        let context = format!("{}\n\n{}", search.context, market_context);

        let response = match self.completion_text(question, &context).await {
            Ok(Some(text)) => text,
            Ok(None) => NO_ANSWER.to_string(),
            Err(e) => {
                error!("AI API error: {}", e);
                return AiAnswer {
                    response: CONNECTION_APOLOGY.to_string(),
                    sources: Vec::new(),
                    response_time: 0.0,
                    timestamp: Utc::now(),
                };
            }
        };

        AiAnswer {
            response,
            sources: extract_sources(&search.context, &search.sources),
            response_time: started.elapsed().as_secs_f64(),
            timestamp: Utc::now(),
        }
    }

    /// Market data blocks for the categories the query mentions. A query
    /// that names neither crypto nor stocks produces an empty context and
    /// no fetcher calls.
    pub async fn market_context(&self, question: &str) -> String {
        let mut context = String::new();

        if query::mentions_crypto(question) {
            let crypto = self.market.crypto_markets(10).await;
            if !crypto.is_empty() {
                context.push_str("**Real-time Cryptocurrency Data:**\n");
                for coin in crypto.iter().take(CONTEXT_RECORD_CAP) {
                    context.push_str(&format!(
                        "\u{2022} {} ({}): ${} ({:+.2}%)\n",
                        coin.name,
                        coin.symbol,
                        money(coin.price),
                        coin.price_chg
                    ));
                }
                context.push('\n');
            }
        }

        if query::mentions_stocks(question) {
            let stocks = self.market.stocks().await;
            if !stocks.is_empty() {
                context.push_str("**Real-time Stock Data:**\n");
                for stock in stocks.iter().take(CONTEXT_RECORD_CAP) {
                    context.push_str(&format!(
                        "\u{2022} {}: ${} ({:+.2}%)\n",
                        stock.symbol,
                        money(stock.price),
                        stock.change_percent_value()
                    ));
                }
                context.push('\n');
            }
        }

        // Bitcoin-specific questions get a dedicated spot-price line on top
        // of the general crypto block.
        if query::mentions_bitcoin(question) {
            if let Some(btc) = self.market.bitcoin().await {
                context.push_str(&format!(
                    "**Bitcoin (BTC) Current Price:** ${} ({:+.2}%)\n\n",
                    money(btc.price),
                    btc.change_24h
                ));
            }
        }

        context
    }

    /// Top web-search results formatted as numbered source lines, plus the
    /// parallel source list for citations. Cached by query content.
    pub async fn search_context(&self, question: &str) -> SearchResults {
        let cache_key = content_key("search", question);
        if let Some(cached) = self.search_cache.get(&cache_key).await {
            debug!("Using cached search context");
            return cached;
        }

        let search_query = format!("finance {}", query::normalize(question));
        match self.serper.search(&search_query, SEARCH_RESULT_CAP).await {
            Ok(results) => {
                let mut context = String::new();
                let mut sources = Vec::new();
                for (i, item) in results.iter().take(SEARCH_RESULT_CAP).enumerate() {
                    context.push_str(&format!(
                        "Source {}: {}. {}\n\n",
                        i + 1,
                        item.title,
                        item.snippet
                    ));
                    sources.push(SearchSource {
                        id: i + 1,
                        title: item.title.clone(),
                        url: item.link.clone(),
                    });
                }

                let results = SearchResults { context, sources };
                self.search_cache.set(cache_key, results.clone()).await;
                results
            }
            Err(e) => {
                error!("Search error: {}", e);
                SearchResults::default()
            }
        }
    }

    /// Completion call cached by (question, context) content.
    async fn completion_text(&self, question: &str, context: &str) -> Result<Option<String>> {
        let cache_key = content_key("ai", &format!("{}{}", question, context));
        if let Some(cached) = self.completion_cache.get(&cache_key).await {
            debug!("Using cached completion");
            return Ok(Some(cached));
        }

        let user_prompt = format!(
            "Context and Real-time Data: {}\n\nQuestion: {}",
            context, question
        );
        let text = self.completion.complete(SYSTEM_PROMPT, &user_prompt).await?;

        if let Some(text) = &text {
            self.completion_cache.set(cache_key, text.clone()).await;
        }
        Ok(text)
    }

    pub async fn news(&self, topic: &str, limit: usize) -> Vec<NewsItem> {
        let cache_key = format!("news_{}_{}", topic, limit);
        if let Some(cached) = self.news_cache.get(&cache_key).await {
            debug!("Using cached news for '{}'", topic);
            return cached;
        }

        match self.newsapi.everything(topic, limit).await {
            Ok(items) => {
                self.news_cache.set(cache_key, items.clone()).await;
                items
            }
            Err(e) => {
                error!("News API error: {}", e);
                Vec::new()
            }
        }
    }
}

/// Best-effort citation extraction from the numbered "Source N:" lines of
/// the search context, order preserved, capped at three. URLs come from the
/// parallel source list.
fn extract_sources(search_context: &str, sources: &[SearchSource]) -> Vec<SourceRef> {
    let mut refs = Vec::new();
    for line in search_context.lines() {
        if refs.len() == SEARCH_RESULT_CAP {
            break;
        }
        if !line.starts_with("Source") {
            continue;
        }
        let Some((_, rest)) = line.split_once(':') else {
            continue;
        };
        let rest = rest.trim();
        let title = rest.split(". ").next().unwrap_or(rest).trim_end_matches('.');
        let url = sources
            .get(refs.len())
            .map(|s| s.url.clone())
            .unwrap_or_else(|| "#".to_string());
        refs.push(SourceRef {
            title: title.to_string(),
            url,
        });
    }
    refs
}

/// `50000` -> `50,000.00`
fn money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let int_grouped: String = grouped.chars().rev().collect();
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, int_grouped, frac_part)
}
