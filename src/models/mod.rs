pub mod ai;
pub mod market;

pub use ai::{AiAnswer, NewsItem, SearchResults, SearchSource, SourceRef};
pub use market::{
    BitcoinSpot, ChartSeries, CryptoRecord, EconomicObservation, EconomicSeries, ForexRecord,
    MarketSnapshot, StockRecord,
};
