use anyhow::{Context, Result};
use basecamp_core::{AppError, Config, TemperatureUnit};
use basecamp_trips::{Catalog, Trip};
use basecamp_weather::{WeatherData, WeatherKind, WeatherProvider, WeatherService};
use futures_util::future::join_all;

#[tokio::main]
async fn main() -> Result<()> {
    basecamp_core::init()?;

    let (config, _) = Config::load_validated()?;
    let catalog = Catalog::load(&config.trips).map_err(|e| {
        tracing::error!("{}", e);
        let error = AppError::from(e);
        eprintln!("{}", error.user_message());
        error
    })?;

    let provider = WeatherProvider::new(&config.weather).context("Failed to set up weather")?;
    let service = WeatherService::new(provider);

    let ids: Vec<String> = std::env::args().skip(1).collect();
    let trips: Vec<&Trip> = if ids.is_empty() {
        catalog.trips.iter().collect()
    } else {
        ids.iter()
            .filter_map(|id| match catalog.by_id(id) {
                Ok(trip) => Some(trip),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            })
            .collect()
    };

    tracing::info!("Resolving weather for {} trips", trips.len());

    let lookups = trips.iter().map(|trip| {
        let service = service.clone();
        async move {
            let request = trip.weather_request()?;
            match service.weather_for_event(&request).await {
                Ok(weather) => Some((*trip, weather)),
                Err(e) => {
                    let retryable = e.is_retryable();
                    let error = AppError::from(e);
                    tracing::warn!(
                        retryable,
                        "Skipping weather for {}: {} ({})",
                        trip.id,
                        error.user_message(),
                        error
                    );
                    None
                }
            }
        }
    });

    let unit = config.weather.temperature_unit;
    let years = service.provider().history_years().len();
    for (trip, weather) in join_all(lookups).await.into_iter().flatten() {
        print_trip(trip, &weather, unit, years);
    }

    Ok(())
}

fn print_trip(trip: &Trip, weather: &WeatherData, unit: TemperatureUnit, years: usize) {
    let source = match weather.kind {
        WeatherKind::Forecast => "forecast".to_string(),
        WeatherKind::Historical => format!("typical weather, {}-year average", years),
    };
    println!("{} ({}): {}", trip.park_name, trip.display_dates(), source);

    for day in &weather.days {
        println!(
            "  {}  {:>3}{} / {:>3}{}  {:>3}% rain  {}",
            day.date.format("%a %b %d"),
            day.temp_max,
            unit.symbol(),
            day.temp_min,
            unit.symbol(),
            day.precipitation_probability,
            day.condition().description()
        );
    }
}
