use std::sync::Arc;

use basecamp_core::WeatherConfig;
use futures_util::future::try_join_all;
use tracing::instrument;

use crate::aggregate::{aggregate_history, forecast_days, YearSample};
use crate::client::OpenMeteoClient;
use crate::dates::{Clock, DateError, EventWindow, ForecastRange, SystemClock};
use crate::error::WeatherError;
use crate::types::{Coordinates, EventWeatherRequest, WeatherData, WeatherDay, WeatherKind};

/// Picks forecast or historical weather for a trip and produces its days.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<OpenMeteoClient>,
    clock: Arc<dyn Clock>,
    event_year: i32,
    range: ForecastRange,
    history_years: u32,
    rain_threshold: f64,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &WeatherConfig, clock: Arc<dyn Clock>) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(OpenMeteoClient::new(config)?),
            clock,
            event_year: config.event_year,
            range: ForecastRange {
                past_days: config.forecast_past_days,
                horizon_days: config.forecast_horizon_days,
            },
            history_years: config.history_years,
            rain_threshold: config.rain_threshold,
        })
    }

    /// Calendar dates of a trip in the configured event year
    pub fn resolve_window(&self, month: &str, dates: &str) -> Result<EventWindow, DateError> {
        EventWindow::resolve(month, dates, self.event_year)
    }

    /// Which path a window would take right now
    pub fn select_kind(&self, window: &EventWindow) -> WeatherKind {
        if self.range.contains(window.start, self.clock.now()) {
            WeatherKind::Forecast
        } else {
            WeatherKind::Historical
        }
    }

    /// Prior calendar years averaged on the historical path, oldest first
    pub fn history_years(&self) -> Vec<i32> {
        let n = self.history_years as i32;
        (self.event_year - n..self.event_year).collect()
    }

    /// Resolve the trip's dates and fetch its weather.
    #[instrument(skip(self, request), fields(event_id = %request.event_id), level = "info")]
    pub async fn fetch(&self, request: &EventWeatherRequest) -> Result<WeatherData, WeatherError> {
        let window = self.resolve_window(&request.month, &request.dates)?;
        let kind = self.select_kind(&window);

        tracing::info!(
            "Using {} weather for {} to {}",
            kind,
            window.start_iso(),
            window.end_iso()
        );

        let days = match kind {
            WeatherKind::Forecast => self.fetch_forecast(request.coordinates, &window).await?,
            WeatherKind::Historical => self.fetch_historical(request.coordinates, &window).await?,
        };

        Ok(WeatherData { kind, days })
    }

    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
        window: &EventWindow,
    ) -> Result<Vec<WeatherDay>, WeatherError> {
        let daily = self.client.fetch_forecast(coordinates, window).await?;
        forecast_days(daily)
    }

    /// All years are fetched concurrently; the first failure fails the lot.
    async fn fetch_historical(
        &self,
        coordinates: Coordinates,
        window: &EventWindow,
    ) -> Result<Vec<WeatherDay>, WeatherError> {
        let years = self.history_years();
        if years.is_empty() {
            return Err(WeatherError::NoHistoryYears);
        }

        let requests = years.into_iter().map(|year| async move {
            let past = window.with_year(year)?;
            let daily = self.client.fetch_archive(coordinates, &past).await?;
            Ok::<_, WeatherError>(YearSample { year, daily })
        });

        let samples = try_join_all(requests).await?;
        aggregate_history(window, &samples, self.rain_threshold)
    }
}
