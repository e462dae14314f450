use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoRecord {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    /// 24h price change, percent.
    pub price_chg: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub market_cap_rank: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecord {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    /// Percent change with the provider's trailing `%` stripped.
    pub change_percent: String,
    pub volume: u64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub open: Option<f64>,
}

impl StockRecord {
    /// Numeric view of `change_percent`; falls back to 0 on a malformed value.
    pub fn change_percent_value(&self) -> f64 {
        self.change_percent.trim().parse().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForexRecord {
    pub pair: String,
    pub price: f64,
    /// Always 0 when sourced from a realtime-rate-only provider.
    pub change: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub crypto: Vec<CryptoRecord>,
    pub stocks: Vec<StockRecord>,
    pub forex: Vec<ForexRecord>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitcoinSpot {
    pub price: f64,
    pub change_24h: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
}

/// Historical chart series as returned by the chart provider:
/// `[timestamp_ms, value]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub prices: Vec<[f64; 2]>,
    pub market_caps: Vec<[f64; 2]>,
    pub total_volumes: Vec<[f64; 2]>,
    pub coin_id: String,
    pub days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicObservation {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicSeries {
    pub series_id: String,
    pub observations: Vec<EconomicObservation>,
}
