use crate::api::{AlphaVantageClient, CoinGeckoClient, FredClient};
use crate::config::CacheConfig;
use crate::models::market::{
    BitcoinSpot, ChartSeries, CryptoRecord, EconomicSeries, ForexRecord, MarketSnapshot,
    StockRecord,
};
use crate::utils::cache::Cache;
use chrono::Utc;
use futures::future::join_all;
use log::{debug, error};

/// Symbols fetched for the stock list endpoint.
const TOP_STOCK_SYMBOLS: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "JPM", "V", "WMT",
];

/// Major currency pairs fetched for the forex list.
const MAJOR_FOREX_PAIRS: [(&str, &str); 5] = [
    ("EUR", "USD"),
    ("GBP", "USD"),
    ("USD", "JPY"),
    ("USD", "CAD"),
    ("AUD", "USD"),
];

/// Cached, failure-tolerant access to the market data providers. Every
/// public method degrades to an empty result instead of propagating an
/// upstream failure; callers can therefore fan out freely.
#[derive(Debug, Clone)]
pub struct MarketService {
    coingecko: CoinGeckoClient,
    alphavantage: AlphaVantageClient,
    fred: FredClient,
    crypto_cache: Cache<Vec<CryptoRecord>>,
    chart_cache: Cache<ChartSeries>,
    stock_cache: Cache<Vec<StockRecord>>,
    forex_cache: Cache<Vec<ForexRecord>>,
    bitcoin_cache: Cache<BitcoinSpot>,
    economic_cache: Cache<EconomicSeries>,
}

impl MarketService {
    pub fn new(
        coingecko: CoinGeckoClient,
        alphavantage: AlphaVantageClient,
        fred: FredClient,
        cache: &CacheConfig,
    ) -> Self {
        Self {
            coingecko,
            alphavantage,
            fred,
            crypto_cache: Cache::new(cache.crypto_ttl),
            chart_cache: Cache::new(cache.chart_ttl),
            stock_cache: Cache::new(cache.stock_ttl),
            forex_cache: Cache::new(cache.forex_ttl),
            bitcoin_cache: Cache::new(cache.bitcoin_ttl),
            economic_cache: Cache::new(cache.economic_ttl),
        }
    }

    /// All market data in one snapshot. The three branches run concurrently
    /// and have already converted their own failures into empty lists, so
    /// the join itself never observes an error.
    pub async fn comprehensive(&self) -> MarketSnapshot {
        let (crypto, stocks, forex) =
            futures::join!(self.crypto_markets(50), self.stocks(), self.forex());

        MarketSnapshot {
            crypto,
            stocks,
            forex,
            timestamp: Utc::now(),
        }
    }

    pub async fn crypto_markets(&self, limit: u32) -> Vec<CryptoRecord> {
        let cache_key = format!("crypto_data_{}", limit);
        if let Some(cached) = self.crypto_cache.get(&cache_key).await {
            debug!("Using cached crypto list for limit {}", limit);
            return cached;
        }

        match self.coingecko.markets(limit, 1).await {
            Ok(records) => {
                self.crypto_cache.set(cache_key, records.clone()).await;
                records
            }
            Err(e) => {
                error!("Error fetching crypto data: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn crypto_by_symbol(&self, symbol: &str) -> Option<CryptoRecord> {
        let symbol = symbol.to_uppercase();
        self.crypto_markets(250)
            .await
            .into_iter()
            .find(|coin| coin.symbol == symbol)
    }

    /// Chart series for one coin. `None` means the upstream call failed;
    /// callers treat an empty price list as not-found.
    pub async fn chart(&self, coin_id: &str, days: u32) -> Option<ChartSeries> {
        let cache_key = format!("crypto_chart_{}_{}", coin_id, days);
        if let Some(cached) = self.chart_cache.get(&cache_key).await {
            debug!("Using cached chart for {}", coin_id);
            return Some(cached);
        }

        match self.coingecko.market_chart(coin_id, days).await {
            Ok(chart) => {
                self.chart_cache.set(cache_key, chart.clone()).await;
                Some(chart)
            }
            Err(e) => {
                error!("Error fetching crypto chart for {}: {}", coin_id, e);
                None
            }
        }
    }

    /// Quotes for the fixed top-10 symbols, fetched concurrently. Failed or
    /// unknown symbols are dropped; a partial list is a valid result.
    pub async fn stocks(&self) -> Vec<StockRecord> {
        if let Some(cached) = self.stock_cache.get("stock_data").await {
            debug!("Using cached stock list");
            return cached;
        }

        let quotes = join_all(
            TOP_STOCK_SYMBOLS
                .iter()
                .map(|symbol| self.stock_quote(symbol)),
        )
        .await;
        let stocks: Vec<StockRecord> = quotes.into_iter().flatten().collect();

        self.stock_cache
            .set("stock_data".to_string(), stocks.clone())
            .await;
        stocks
    }

    /// Uncached single-symbol quote; `None` covers both provider failure and
    /// unknown symbols.
    pub async fn stock_quote(&self, symbol: &str) -> Option<StockRecord> {
        match self.alphavantage.global_quote(symbol).await {
            Ok(quote) => quote,
            Err(e) => {
                error!("Error fetching stock {}: {}", symbol, e);
                None
            }
        }
    }

    /// List lookup first, then a direct single-symbol fetch for symbols
    /// outside the cached top-10.
    pub async fn stock_by_symbol(&self, symbol: &str) -> Option<StockRecord> {
        let symbol = symbol.to_uppercase();
        if let Some(stock) = self
            .stocks()
            .await
            .into_iter()
            .find(|stock| stock.symbol == symbol)
        {
            return Some(stock);
        }
        self.stock_quote(&symbol).await
    }

    pub async fn forex(&self) -> Vec<ForexRecord> {
        if let Some(cached) = self.forex_cache.get("forex_data").await {
            debug!("Using cached forex list");
            return cached;
        }

        let rates = join_all(
            MAJOR_FOREX_PAIRS
                .iter()
                .map(|(from, to)| self.forex_rate(from, to)),
        )
        .await;
        let forex: Vec<ForexRecord> = rates.into_iter().flatten().collect();

        self.forex_cache
            .set("forex_data".to_string(), forex.clone())
            .await;
        forex
    }

    async fn forex_rate(&self, from: &str, to: &str) -> Option<ForexRecord> {
        match self.alphavantage.exchange_rate(from, to).await {
            Ok(rate) => rate,
            Err(e) => {
                error!("Error fetching forex rate {}/{}: {}", from, to, e);
                None
            }
        }
    }

    pub async fn bitcoin(&self) -> Option<BitcoinSpot> {
        if let Some(cached) = self.bitcoin_cache.get("bitcoin_price").await {
            debug!("Using cached bitcoin price");
            return Some(cached);
        }

        match self.coingecko.bitcoin_price().await {
            Ok(spot) => {
                self.bitcoin_cache
                    .set("bitcoin_price".to_string(), spot.clone())
                    .await;
                Some(spot)
            }
            Err(e) => {
                error!("Error fetching Bitcoin price: {}", e);
                None
            }
        }
    }

    pub async fn economic(&self, series_id: &str) -> Option<EconomicSeries> {
        let cache_key = format!("econ_{}", series_id);
        if let Some(cached) = self.economic_cache.get(&cache_key).await {
            debug!("Using cached economic series {}", series_id);
            return Some(cached);
        }

        match self.fred.series_observations(series_id).await {
            Ok(series) => {
                self.economic_cache.set(cache_key, series.clone()).await;
                Some(series)
            }
            Err(e) => {
                error!("Error fetching economic series {}: {}", series_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    fn service_for(coingecko_url: String, alphavantage_url: String) -> MarketService {
        MarketService::new(
            CoinGeckoClient::with_base_url(None, coingecko_url),
            AlphaVantageClient::with_base_url("test", alphavantage_url),
            FredClient::with_base_url("test", "http://127.0.0.1:9"),
            &CacheConfig::default(),
        )
    }

    fn quote_body(price: &str) -> String {
        format!(
            r#"{{"Global Quote": {{
                "02. open": "100.0", "03. high": "110.0", "04. low": "95.0",
                "05. price": "{}", "06. volume": "1000",
                "09. change": "1.0", "10. change percent": "1.00%"
            }}}}"#,
            price
        )
    }

    #[tokio::test]
    async fn crypto_list_is_fetched_once_within_ttl() {
        let mut gecko = mockito::Server::new_async().await;
        let markets = gecko
            .mock("GET", "/coins/markets")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{"symbol": "btc", "name": "Bitcoin", "current_price": 50000.0,
                     "price_change_percentage_24h": 1.0, "total_volume": 1.0,
                     "market_cap": 2.0, "market_cap_rank": 1}]"#,
            )
            .expect(1)
            .create_async()
            .await;

        let service = service_for(gecko.url(), "http://127.0.0.1:9".to_string());
        let first = service.crypto_markets(50).await;
        let second = service.crypto_markets(50).await;
        markets.assert_async().await;

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].symbol, second[0].symbol);
        assert_eq!(first[0].price, second[0].price);
    }

    #[tokio::test]
    async fn comprehensive_tolerates_one_failing_branch() {
        let mut gecko = mockito::Server::new_async().await;
        gecko
            .mock("GET", "/coins/markets")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let mut av = mockito::Server::new_async().await;
        av.mock("GET", "/")
            .match_query(mockito::Matcher::UrlEncoded(
                "function".into(),
                "GLOBAL_QUOTE".into(),
            ))
            .with_status(200)
            .with_body(quote_body("190.5"))
            .create_async()
            .await;
        av.mock("GET", "/")
            .match_query(mockito::Matcher::UrlEncoded(
                "function".into(),
                "CURRENCY_EXCHANGE_RATE".into(),
            ))
            .with_status(200)
            .with_body(r#"{"Realtime Currency Exchange Rate": {"5. Exchange Rate": "1.0950"}}"#)
            .create_async()
            .await;

        let service = service_for(gecko.url(), av.url() + "/");
        let snapshot = service.comprehensive().await;

        assert!(snapshot.crypto.is_empty());
        assert_eq!(snapshot.stocks.len(), TOP_STOCK_SYMBOLS.len());
        assert_eq!(snapshot.forex.len(), MAJOR_FOREX_PAIRS.len());
    }

    #[tokio::test]
    async fn stock_lookup_falls_back_to_direct_fetch() {
        let mut av = mockito::Server::new_async().await;
        av.mock("GET", "/")
            .match_query(mockito::Matcher::UrlEncoded(
                "function".into(),
                "GLOBAL_QUOTE".into(),
            ))
            .with_status(200)
            .with_body(quote_body("42.0"))
            .create_async()
            .await;

        let service = service_for("http://127.0.0.1:9".to_string(), av.url() + "/");
        // NFLX is not in the fixed top-10 list, so this must go through the
        // single-symbol fallback.
        let stock = service.stock_by_symbol("nflx").await.unwrap();
        assert_eq!(stock.symbol, "NFLX");
        assert_eq!(stock.price, 42.0);
    }

    #[tokio::test]
    async fn unknown_stock_is_not_found() {
        let mut av = mockito::Server::new_async().await;
        av.mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Global Quote": {}}"#)
            .create_async()
            .await;

        let service = service_for("http://127.0.0.1:9".to_string(), av.url() + "/");
        assert!(service.stock_by_symbol("ZZZZ").await.is_none());
    }

    #[tokio::test]
    async fn bitcoin_failure_degrades_to_none() {
        let mut gecko = mockito::Server::new_async().await;
        gecko
            .mock("GET", "/simple/price")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let service = service_for(gecko.url(), "http://127.0.0.1:9".to_string());
        assert!(service.bitcoin().await.is_none());
    }

    #[tokio::test]
    async fn chart_with_empty_prices_is_returned_as_is() {
        let mut gecko = mockito::Server::new_async().await;
        gecko
            .mock("GET", "/coins/unknown-coin/market_chart")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"prices": [], "market_caps": [], "total_volumes": []}"#)
            .create_async()
            .await;

        let service = service_for(gecko.url(), "http://127.0.0.1:9".to_string());
        let chart = service.chart("unknown-coin", 30).await.unwrap();
        // the boundary maps an empty price list to not-found
        assert!(chart.prices.is_empty());
    }
}
