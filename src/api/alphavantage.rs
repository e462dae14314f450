use crate::error::{Error, Result};
use crate::models::market::{ForexRecord, StockRecord};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const API_BASE_URL: &str = "https://www.alphavantage.co/query";
const QUOTE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
}

/// Alpha Vantage ships every numeric field as a string.
#[derive(Debug, Deserialize, Default)]
struct GlobalQuote {
    #[serde(rename = "02. open", default)]
    open: String,
    #[serde(rename = "03. high", default)]
    high: String,
    #[serde(rename = "04. low", default)]
    low: String,
    #[serde(rename = "05. price", default)]
    price: String,
    #[serde(rename = "06. volume", default)]
    volume: String,
    #[serde(rename = "09. change", default)]
    change: String,
    #[serde(rename = "10. change percent", default)]
    change_percent: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    exchange_rate: Option<ExchangeRate>,
}

#[derive(Debug, Deserialize, Default)]
struct ExchangeRate {
    #[serde(rename = "5. Exchange Rate", default)]
    rate: String,
}

fn parse_num(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
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

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, params: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(&self.base_url)
            .timeout(QUOTE_TIMEOUT)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiError(format!(
                "Alpha Vantage request failed with status: {}",
                status
            )));
        }
        Ok(response.json().await?)
    }

    /// Single-symbol quote. Returns `None` when the provider has no data for
    /// the symbol (it answers 200 with an empty `Global Quote` object).
    pub async fn global_quote(&self, symbol: &str) -> Result<Option<StockRecord>> {
        let symbol = symbol.to_uppercase();
        let data: GlobalQuoteResponse = self
            .get_json(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol.as_str())])
            .await?;

        let quote = match data.global_quote {
            Some(q) if !q.price.trim().is_empty() => q,
            _ => return Ok(None),
        };

        Ok(Some(StockRecord {
            symbol,
            price: parse_num(&quote.price),
            change: parse_num(&quote.change),
            change_percent: quote.change_percent.trim_end_matches('%').to_string(),
            volume: quote.volume.trim().parse().unwrap_or(0),
            high: Some(parse_num(&quote.high)),
            low: Some(parse_num(&quote.low)),
            open: Some(parse_num(&quote.open)),
        }))
    }

    /// Realtime currency pair rate. The provider has no historical delta, so
    /// `change` is always 0.
    pub async fn exchange_rate(&self, from: &str, to: &str) -> Result<Option<ForexRecord>> {
        let data: ExchangeRateResponse = self
            .get_json(&[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", from),
                ("to_currency", to),
            ])
            .await?;

        let rate = match data.exchange_rate {
            Some(r) if !r.rate.trim().is_empty() => r,
            _ => return Ok(None),
        };

        Ok(Some(ForexRecord {
            pair: format!("{}/{}", from, to),
            price: parse_num(&rate.rate),
            change: 0.0,
        }))
    }
}
