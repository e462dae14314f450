use crate::error::{Error, Result};
use crate::services::{AiService, MarketService};
use crate::web::handlers::{self, AskRequest, ChartParams, ListParams, NewsParams};
use log::info;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

pub struct WebServer {
    market: Arc<MarketService>,
    ai: Arc<AiService>,
    allowed_origins: Vec<String>,
}

fn with_market(
    market: Arc<MarketService>,
) -> impl Filter<Extract = (Arc<MarketService>,), Error = Infallible> + Clone {
    warp::any().map(move || market.clone())
}

fn with_ai(ai: Arc<AiService>) -> impl Filter<Extract = (Arc<AiService>,), Error = Infallible> + Clone {
    warp::any().map(move || ai.clone())
}

impl WebServer {
    pub fn new(market: Arc<MarketService>, ai: Arc<AiService>, allowed_origins: Vec<String>) -> Self {
        Self {
            market,
            ai,
            allowed_origins,
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let market = self.market.clone();
        let ai = self.ai.clone();

        let root = warp::path::end().and(warp::get()).and_then(handlers::root);
        let health = warp::path!("health").and(warp::get()).and_then(handlers::health);

        let market_data = warp::path!("api" / "finance" / "market-data")
            .and(warp::get())
            .and(with_market(market.clone()))
            .and_then(handlers::market_data);

        let crypto_chart = warp::path!("api" / "finance" / "crypto" / "chart" / String)
            .and(warp::get())
            .and(warp::query::<ChartParams>())
            .and(with_market(market.clone()))
            .and_then(handlers::crypto_chart);

        let bitcoin_price = warp::path!("api" / "finance" / "bitcoin" / "price")
            .and(warp::get())
            .and(with_market(market.clone()))
            .and_then(handlers::bitcoin_price);

        let economic = warp::path!("api" / "finance" / "economic" / String)
            .and(warp::get())
            .and(with_market(market.clone()))
            .and_then(handlers::economic_series);

        // the literal "list" route must come before the symbol capture
        let crypto_list = warp::path!("api" / "crypto" / "list")
            .and(warp::get())
            .and(warp::query::<ListParams>())
            .and(with_market(market.clone()))
            .and_then(handlers::crypto_list);

        let crypto_by_symbol = warp::path!("api" / "crypto" / String)
            .and(warp::get())
            .and(with_market(market.clone()))
            .and_then(handlers::crypto_by_symbol);

        let stocks_list = warp::path!("api" / "stocks" / "list")
            .and(warp::get())
            .and(with_market(market.clone()))
            .and_then(handlers::stocks_list);

        let stock_by_symbol = warp::path!("api" / "stocks" / String)
            .and(warp::get())
            .and(with_market(market))
            .and_then(handlers::stock_by_symbol);

        let ask = warp::path!("api" / "ai" / "ask")
            .and(warp::post())
            .and(warp::body::content_length_limit(16 * 1024))
            .and(warp::body::json::<AskRequest>())
            .and(with_ai(ai.clone()))
            .and_then(handlers::ask);

        let news = warp::path!("api" / "ai" / "news")
            .and(warp::get())
            .and(warp::query::<NewsParams>())
            .and(with_ai(ai))
            .and_then(handlers::news);

        let cors = warp::cors()
            .allow_origins(self.allowed_origins.iter().map(|s| s.as_str()))
            .allow_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_headers(vec!["content-type"]);

        root.or(health)
            .or(market_data)
            .or(crypto_chart)
            .or(bitcoin_price)
            .or(economic)
            .or(crypto_list)
            .or(crypto_by_symbol)
            .or(stocks_list)
            .or(stock_by_symbol)
            .or(ask)
            .or(news)
            .with(cors)
            .with(warp::log("finance_gateway::web"))
    }

    pub async fn run(&self, host: &str, port: u16) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| Error::ConfigError(format!("Invalid listen address: {}", e)))?;

        info!("Starting web server on {}", addr);
        warp::serve(self.routes()).run(addr).await;
        Ok(())
    }
}
