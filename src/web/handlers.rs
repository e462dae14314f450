use crate::services::{AiService, MarketService};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Reply, WithStatus};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NewsParams {
    pub query: Option<String>,
    pub limit: Option<usize>,
}

fn ok(body: &impl serde::Serialize) -> WithStatus<reply::Json> {
    reply::with_status(reply::json(body), StatusCode::OK)
}

fn not_found(message: String) -> WithStatus<reply::Json> {
    reply::with_status(reply::json(&json!({ "error": message })), StatusCode::NOT_FOUND)
}

pub async fn root() -> Result<impl Reply, Infallible> {
    Ok(reply::json(&json!({
        "message": "Finance Gateway API",
        "status": "running"
    })))
}

pub async fn health() -> Result<impl Reply, Infallible> {
    Ok(reply::json(&json!({
        "status": "healthy",
        "timestamp": Utc::now()
    })))
}

pub async fn market_data(market: Arc<MarketService>) -> Result<impl Reply, Infallible> {
    Ok(reply::json(&market.comprehensive().await))
}

pub async fn crypto_list(
    params: ListParams,
    market: Arc<MarketService>,
) -> Result<impl Reply, Infallible> {
    let limit = params.limit.unwrap_or(100).clamp(1, 250);
    let page = params.page.unwrap_or(1).max(1);
    let data = market.crypto_markets(limit).await;
    Ok(reply::json(&json!({
        "count": data.len(),
        "data": data,
        "limit": limit,
        "page": page
    })))
}

pub async fn crypto_by_symbol(
    symbol: String,
    market: Arc<MarketService>,
) -> Result<impl Reply, Infallible> {
    Ok(match market.crypto_by_symbol(&symbol).await {
        Some(coin) => ok(&coin),
        None => not_found(format!("Cryptocurrency {} not found", symbol)),
    })
}

pub async fn crypto_chart(
    coin_id: String,
    params: ChartParams,
    market: Arc<MarketService>,
) -> Result<impl Reply, Infallible> {
    let days = params.days.unwrap_or(30).clamp(1, 365);
    Ok(match market.chart(&coin_id, days).await {
        Some(chart) if !chart.prices.is_empty() => ok(&chart),
        _ => not_found(format!("Chart data not found for coin '{}'", coin_id)),
    })
}

pub async fn bitcoin_price(market: Arc<MarketService>) -> Result<impl Reply, Infallible> {
    Ok(match market.bitcoin().await {
        Some(spot) => reply::json(&spot),
        // degrade to an empty object rather than failing the request
        None => reply::json(&json!({})),
    })
}

pub async fn economic_series(
    series_id: String,
    market: Arc<MarketService>,
) -> Result<impl Reply, Infallible> {
    Ok(match market.economic(&series_id).await {
        Some(series) => ok(&series),
        None => not_found(format!("Economic series {} not found", series_id)),
    })
}

pub async fn stocks_list(market: Arc<MarketService>) -> Result<impl Reply, Infallible> {
    let data = market.stocks().await;
    Ok(reply::json(&json!({
        "count": data.len(),
        "data": data
    })))
}

pub async fn stock_by_symbol(
    symbol: String,
    market: Arc<MarketService>,
) -> Result<impl Reply, Infallible> {
    Ok(match market.stock_by_symbol(&symbol).await {
        Some(stock) => ok(&stock),
        None => not_found(format!("Stock {} not found", symbol)),
    })
}

pub async fn ask(request: AskRequest, ai: Arc<AiService>) -> Result<impl Reply, Infallible> {
    if request.query.trim().is_empty() {
        return Ok(reply::with_status(
            reply::json(&json!({ "error": "Query must not be empty" })),
            StatusCode::BAD_REQUEST,
        ));
    }
    Ok(ok(&ai.answer(&request.query).await))
}

pub async fn news(params: NewsParams, ai: Arc<AiService>) -> Result<impl Reply, Infallible> {
    let topic = params.query.unwrap_or_default();
    let limit = params.limit.unwrap_or(10).clamp(1, 50);
    let items = ai.news(&topic, limit).await;
    Ok(reply::json(&json!({ "news": items })))
}
