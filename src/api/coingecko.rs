use crate::error::{Error, Result};
use crate::models::market::{BitcoinSpot, ChartSeries, CryptoRecord};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const API_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const LIST_TIMEOUT: Duration = Duration::from_secs(10);
const SPOT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct MarketsItem {
    symbol: String,
    name: String,
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    total_volume: Option<f64>,
    market_cap: Option<f64>,
    market_cap_rank: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    prices: Vec<[f64; 2]>,
    #[serde(default)]
    market_caps: Vec<[f64; 2]>,
    #[serde(default)]
    total_volumes: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: Option<SpotQuote>,
}

#[derive(Debug, Deserialize)]
struct SpotQuote {
    usd: f64,
    usd_24h_change: Option<f64>,
    usd_24h_vol: Option<f64>,
    usd_market_cap: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, API_BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: super::http_client(),
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut request = self.client.get(&url).timeout(timeout).query(params);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiError(format!(
                "CoinGecko request to {} failed with status: {}",
                endpoint, status
            )));
        }
        Ok(response.json().await?)
    }

    /// Top coins by market cap, normalized.
    pub async fn markets(&self, limit: u32, page: u32) -> Result<Vec<CryptoRecord>> {
        let params = [
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", limit.to_string()),
            ("page", page.to_string()),
            ("sparkline", "false".to_string()),
            ("price_change_percentage", "24h".to_string()),
        ];
        let items: Vec<MarketsItem> = self.get_json("coins/markets", &params, LIST_TIMEOUT).await?;

        Ok(items
            .into_iter()
            .map(|item| CryptoRecord {
                symbol: item.symbol.to_uppercase(),
                name: item.name,
                price: item.current_price.unwrap_or_default(),
                price_chg: item.price_change_percentage_24h.unwrap_or_default(),
                volume_24h: item.total_volume.unwrap_or_default(),
                market_cap: item.market_cap.unwrap_or_default(),
                market_cap_rank: item.market_cap_rank,
            })
            .collect())
    }

    pub async fn market_chart(&self, coin_id: &str, days: u32) -> Result<ChartSeries> {
        let interval = if days > 90 { "daily" } else { "hourly" };
        let params = [
            ("vs_currency", "usd".to_string()),
            ("days", days.to_string()),
            ("interval", interval.to_string()),
        ];
        let chart: MarketChart = self
            .get_json(
                &format!("coins/{}/market_chart", coin_id),
                &params,
                LIST_TIMEOUT,
            )
            .await?;

        Ok(ChartSeries {
            prices: chart.prices,
            market_caps: chart.market_caps,
            total_volumes: chart.total_volumes,
            coin_id: coin_id.to_string(),
            days,
        })
    }

    /// Bitcoin spot price with 24h stats.
    pub async fn bitcoin_price(&self) -> Result<BitcoinSpot> {
        let params = [
            ("ids", "bitcoin".to_string()),
            ("vs_currencies", "usd".to_string()),
            ("include_24hr_change", "true".to_string()),
            ("include_24hr_vol", "true".to_string()),
            ("include_market_cap", "true".to_string()),
        ];
        let data: SimplePriceResponse = self
            .get_json("simple/price", &params, SPOT_TIMEOUT)
            .await?;

        let quote = data
            .bitcoin
            .ok_or_else(|| Error::ApiInvalidData("Missing bitcoin entry in spot response".into()))?;

        Ok(BitcoinSpot {
            price: quote.usd,
            change_24h: quote.usd_24h_change.unwrap_or_default(),
            volume_24h: quote.usd_24h_vol.unwrap_or_default(),
            market_cap: quote.usd_market_cap.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn markets_normalizes_symbols_and_defaults() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/markets")
            .match_query(mockito::Matcher::UrlEncoded("per_page".into(), "2".into()))
            .with_status(200)
            .with_body(
                r#"[
                    {"symbol": "btc", "name": "Bitcoin", "current_price": 50000.0,
                     "price_change_percentage_24h": 2.5, "total_volume": 1000000000.0,
                     "market_cap": 1000000000000.0, "market_cap_rank": 1},
                    {"symbol": "eth", "name": "Ethereum", "current_price": null,
                     "price_change_percentage_24h": null, "total_volume": null,
                     "market_cap": null, "market_cap_rank": null}
                ]"#,
            )
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(None, server.url());
        let records = client.markets(2, 1).await.unwrap();
        mock.assert_async().await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol, "BTC");
        assert_eq!(records[0].price, 50000.0);
        assert_eq!(records[0].market_cap_rank, Some(1));
        // null provider fields fall back to zero
        assert_eq!(records[1].symbol, "ETH");
        assert_eq!(records[1].price, 0.0);
        assert_eq!(records[1].market_cap_rank, None);
    }

    #[tokio::test]
    async fn bitcoin_price_maps_spot_fields() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/simple/price")
            .match_query(mockito::Matcher::UrlEncoded("ids".into(), "bitcoin".into()))
            .with_status(200)
            .with_body(
                r#"{"bitcoin": {"usd": 50000.0, "usd_24h_change": 2.5,
                    "usd_24h_vol": 1e9, "usd_market_cap": 1e12}}"#,
            )
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(None, server.url());
        let spot = client.bitcoin_price().await.unwrap();
        assert_eq!(spot.price, 50000.0);
        assert_eq!(spot.change_24h, 2.5);
        assert_eq!(spot.volume_24h, 1e9);
        assert_eq!(spot.market_cap, 1e12);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/coins/markets")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(None, server.url());
        assert!(client.markets(10, 1).await.is_err());
    }

    #[tokio::test]
    async fn chart_interval_follows_day_count() {
        let mut server = mockito::Server::new_async().await;
        let daily = server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(mockito::Matcher::UrlEncoded(
                "interval".into(),
                "daily".into(),
            ))
            .with_status(200)
            .with_body(
                r#"{"prices": [[1700000000000.0, 42000.0]], "market_caps": [], "total_volumes": []}"#,
            )
            .create_async()
            .await;

        let client = CoinGeckoClient::with_base_url(None, server.url());
        let chart = client.market_chart("bitcoin", 180).await.unwrap();
        daily.assert_async().await;
        assert_eq!(chart.coin_id, "bitcoin");
        assert_eq!(chart.days, 180);
        assert_eq!(chart.prices.len(), 1);
    }
}
