//! Open-Meteo HTTP client.
//!
//! Two endpoints are used: the short-range forecast and the historical
//! archive. Both return parallel per-day arrays under `daily`.

use std::time::Duration;

use basecamp_core::{TemperatureUnit, WeatherConfig};
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::dates::EventWindow;
use crate::error::{ApiKind, WeatherError};
use crate::types::Coordinates;

const USER_AGENT: &str = "Basecamp/0.1.0";

const FORECAST_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_probability_max,weathercode";
const ARCHIVE_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode";

#[derive(Debug, Deserialize)]
struct DailyResponse<T> {
    daily: T,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: Option<String>,
}

/// Forecast arrays, one entry per day in `time`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastDaily {
    pub time: Vec<NaiveDate>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<f64>>,
    pub weathercode: Vec<Option<i32>>,
}

/// Archive arrays for one year, one entry per day in `time`
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveDaily {
    pub time: Vec<NaiveDate>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub weathercode: Vec<Option<i32>>,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    forecast_url: Url,
    archive_url: Url,
    timezone: String,
    unit: TemperatureUnit,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            forecast_url: Url::parse(&config.forecast_url)?,
            archive_url: Url::parse(&config.archive_url)?,
            timezone: config.timezone.clone(),
            unit: config.temperature_unit,
        })
    }

    /// Daily forecast for exactly the window's dates.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
        window: &EventWindow,
    ) -> Result<ForecastDaily, WeatherError> {
        let url = self.daily_url(&self.forecast_url, coordinates, window, FORECAST_FIELDS);
        self.get_daily(ApiKind::Forecast, url).await
    }

    /// Daily archive records for the window's dates (use a re-stamped window
    /// to fetch a past year).
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_archive(
        &self,
        coordinates: Coordinates,
        window: &EventWindow,
    ) -> Result<ArchiveDaily, WeatherError> {
        let url = self.daily_url(&self.archive_url, coordinates, window, ARCHIVE_FIELDS);
        self.get_daily(ApiKind::Archive, url).await
    }

    fn daily_url(
        &self,
        base: &Url,
        coordinates: Coordinates,
        window: &EventWindow,
        fields: &str,
    ) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &coordinates.latitude.to_string())
            .append_pair("longitude", &coordinates.longitude.to_string())
            .append_pair("daily", fields)
            .append_pair("start_date", &window.start_iso())
            .append_pair("end_date", &window.end_iso())
            .append_pair("temperature_unit", self.unit.as_query_value())
            .append_pair("timezone", &self.timezone);
        url
    }

    /// Helper to handle API responses and errors.
    async fn get_daily<T: DeserializeOwned>(
        &self,
        api: ApiKind,
        url: Url,
    ) -> Result<T, WeatherError> {
        tracing::debug!("{} request: {}", api, url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.reason)
                .unwrap_or(text);
            tracing::warn!("{} API returned {}: {}", api, status, reason);
            return Err(WeatherError::Api {
                api,
                status: status.as_u16(),
            });
        }

        let body: DailyResponse<T> = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("{} response: {}", api, e)))?;

        Ok(body.daily)
    }
}
