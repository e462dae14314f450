use reqwest::Client;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

pub mod aimlapi;
pub mod alphavantage;
pub mod coingecko;
pub mod fred;
pub mod newsapi;
pub mod serper;

pub use aimlapi::CompletionClient;
pub use alphavantage::AlphaVantageClient;
pub use coingecko::CoinGeckoClient;
pub use fred::FredClient;
pub use newsapi::NewsApiClient;
pub use serper::SerperClient;

/// Default connect timeout shared by all upstream clients; per-request read
/// timeouts are set at each call site.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn http_client() -> Client {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .expect("Failed to create HTTP client")
}

/// Stable process-local hash for deriving cache keys from free text.
/// Collisions are acceptable given the short TTLs and low key cardinality.
pub fn content_key(prefix: &str, text: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    format!("{}_{:x}", prefix, hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_key_is_deterministic_and_prefixed() {
        let a = content_key("search", "bitcoin price");
        let b = content_key("search", "bitcoin price");
        let c = content_key("search", "ethereum price");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("search_"));
    }
}
