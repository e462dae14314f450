//! Free-text query helpers for routing natural-language questions to the
//! relevant data fetchers.

const CRYPTO_TERMS: &[&str] = &["crypto", "bitcoin", "btc", "ethereum", "eth"];
const STOCK_TERMS: &[&str] = &["stock", "stocks", "equity", "apple", "microsoft", "google"];
const BITCOIN_TERMS: &[&str] = &["bitcoin", "btc"];

const FINANCE_TERMS: &[&str] = &[
    "price", "market", "invest", "investment", "trading", "finance", "financial", "forex",
    "currency", "portfolio", "dividend", "earnings", "inflation", "interest", "bond", "fund",
];

/// Common ticker abbreviations expanded to full asset names.
const CRYPTO_ABBREVIATIONS: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("sol", "solana"),
    ("xrp", "ripple"),
    ("doge", "dogecoin"),
    ("ada", "cardano"),
];

fn contains_term(query: &str, terms: &[&str]) -> bool {
    let lowered = query.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| terms.contains(&word))
}

pub fn mentions_crypto(query: &str) -> bool {
    contains_term(query, CRYPTO_TERMS)
}

pub fn mentions_stocks(query: &str) -> bool {
    contains_term(query, STOCK_TERMS)
}

pub fn mentions_bitcoin(query: &str) -> bool {
    contains_term(query, BITCOIN_TERMS)
}

/// Lower-cases, strips punctuation and expands ticker abbreviations so the
/// search upstream sees canonical asset names.
pub fn normalize(query: &str) -> String {
    let lowered = query.to_lowercase();
    let words = lowered
        .split_whitespace()
        .map(|word| {
            let clean: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            for (abbrev, full) in CRYPTO_ABBREVIATIONS {
                if clean == *abbrev {
                    return full.to_string();
                }
            }
            clean
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>();
    words.join(" ")
}

pub fn is_finance_related(query: &str) -> bool {
    mentions_crypto(query)
        || mentions_stocks(query)
        || contains_term(query, FINANCE_TERMS)
        || contains_term(&normalize(query), FINANCE_TERMS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_crypto_and_bitcoin_terms() {
        assert!(mentions_crypto("What is the price of Bitcoin?"));
        assert!(mentions_bitcoin("What is the price of Bitcoin?"));
        assert!(mentions_crypto("is ETH a good buy"));
        assert!(!mentions_bitcoin("tell me about ethereum"));
        assert!(!mentions_crypto("What's the weather?"));
    }

    #[test]
    fn detects_stock_terms_including_company_names() {
        assert!(mentions_stocks("how are tech stocks doing"));
        assert!(mentions_stocks("Apple earnings report"));
        assert!(!mentions_stocks("bitcoin dominance"));
    }

    #[test]
    fn word_boundaries_are_respected() {
        // "stockholm" must not trigger the stock fetcher
        assert!(!mentions_stocks("flights to Stockholm"));
        assert!(!mentions_crypto("add this to my etherpad"));
    }

    #[test]
    fn normalize_expands_abbreviations_and_strips_punctuation() {
        assert_eq!(normalize("BTC price?!"), "bitcoin price");
        assert_eq!(normalize("  Sol vs. ADA "), "solana vs cardano");
    }

    #[test]
    fn finance_relatedness() {
        assert!(is_finance_related("current inflation rate"));
        assert!(is_finance_related("doge price"));
        assert!(!is_finance_related("best pizza in town"));
    }
}
