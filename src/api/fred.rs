use crate::error::{Error, Result};
use crate::models::market::{EconomicObservation, EconomicSeries};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const API_BASE_URL: &str = "https://api.stlouisfed.org/fred";
const SERIES_TIMEOUT: Duration = Duration::from_secs(10);
const OBSERVATION_LIMIT: u32 = 120;

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    #[serde(default)]
    date: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Clone)]
pub struct FredClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FredClient {
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

    /// Recent observations for an economic series, newest first. The
    /// provider marks missing data points with a "." value; those are
    /// dropped.
    pub async fn series_observations(&self, series_id: &str) -> Result<EconomicSeries> {
        let url = format!("{}/series/observations", self.base_url);
        let limit = OBSERVATION_LIMIT.to_string();
        let response = self
            .client
            .get(&url)
            .timeout(SERIES_TIMEOUT)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiError(format!(
                "Economic series request failed with status: {}",
                status
            )));
        }

        let data: ObservationsResponse = response.json().await?;
        let observations = data
            .observations
            .into_iter()
            .filter_map(|obs| {
                obs.value
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .map(|value| EconomicObservation {
                        date: obs.date,
                        value,
                    })
            })
            .collect();

        Ok(EconomicSeries {
            series_id: series_id.to_string(),
            observations,
        })
    }
}
