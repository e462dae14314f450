use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;

use finance_gateway::api::{
    AlphaVantageClient, CoinGeckoClient, CompletionClient, FredClient, NewsApiClient, SerperClient,
};
use finance_gateway::cli::Cli;
use finance_gateway::config::Config;
use finance_gateway::logging;
use finance_gateway::services::{AiService, MarketService};
use finance_gateway::web::WebServer;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.debug);

    info!("Starting finance gateway...");

    let config = match &cli.config {
        Some(path) => Config::load(path).map_err(|e| {
            anyhow::anyhow!("Failed to load configuration from {:?}: {}", path, e)
        })?,
        None => Config::from_env(),
    };
    info!("Configuration loaded.");

    let mut server_config = config.server.clone();
    if let Some(port) = cli.port {
        server_config.port = port;
    }

    let market = Arc::new(MarketService::new(
        CoinGeckoClient::new(config.api.coingecko_api_key.clone()),
        AlphaVantageClient::new(config.api.alpha_vantage_key.clone()),
        FredClient::new(config.api.fred_api_key.clone()),
        &config.cache,
    ));
    let ai = Arc::new(AiService::new(
        market.clone(),
        SerperClient::new(config.api.serper_api_key.clone()),
        CompletionClient::new(config.api.aimlapi_key.clone()),
        NewsApiClient::new(config.api.news_api_key.clone()),
        &config.cache,
    ));
    info!("Services initialized.");

    let server = WebServer::new(market, ai, server_config.allowed_origins.clone());
    server.run(&server_config.host, server_config.port).await?;

    Ok(())
}
