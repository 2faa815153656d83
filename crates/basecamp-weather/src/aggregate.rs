//! Turning raw daily arrays into `WeatherDay`s.

use std::collections::HashMap;

use crate::client::{ArchiveDaily, ForecastDaily};
use crate::dates::EventWindow;
use crate::error::WeatherError;
use crate::types::WeatherDay;

/// One prior year's archive records for the trip's calendar window
#[derive(Debug, Clone)]
pub struct YearSample {
    pub year: i32,
    pub daily: ArchiveDaily,
}

/// Round half up, so -2.5 becomes -2 and 2.5 becomes 3.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn percent(value: f64) -> u8 {
    round_half_up(value).clamp(0, 100) as u8
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Most frequent code. `codes` is ordered oldest year first; on a tie the
/// code from the most recent year wins.
pub fn mode_prefer_recent(codes: &[i32]) -> Option<i32> {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for code in codes {
        *counts.entry(*code).or_default() += 1;
    }

    let mut best: Option<(i32, usize)> = None;
    for code in codes.iter().rev() {
        let count = counts.get(code).copied().unwrap_or(0);
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((*code, count));
        }
    }
    best.map(|(code, _)| code)
}

fn check_len(what: impl FnOnce() -> String, expected: usize, found: usize) -> Result<(), WeatherError> {
    if found == expected {
        Ok(())
    } else {
        Err(WeatherError::ShapeMismatch {
            what: what(),
            expected,
            found,
        })
    }
}

/// Map forecast arrays 1:1 onto days. Temperatures are rounded; the
/// precipitation probability and condition code pass through. A missing
/// precipitation probability reads as 0%.
pub fn forecast_days(daily: ForecastDaily) -> Result<Vec<WeatherDay>, WeatherError> {
    let expected = daily.time.len();
    for (name, len) in [
        ("temperature_2m_max", daily.temperature_2m_max.len()),
        ("temperature_2m_min", daily.temperature_2m_min.len()),
        (
            "precipitation_probability_max",
            daily.precipitation_probability_max.len(),
        ),
        ("weathercode", daily.weathercode.len()),
    ] {
        check_len(|| format!("forecast {}", name), expected, len)?;
    }

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            let missing = |field: &'static str| WeatherError::MissingValue { field, date };
            Ok(WeatherDay {
                date,
                temp_max: round_half_up(
                    daily.temperature_2m_max[i].ok_or_else(|| missing("temperature_2m_max"))?,
                ),
                temp_min: round_half_up(
                    daily.temperature_2m_min[i].ok_or_else(|| missing("temperature_2m_min"))?,
                ),
                precipitation_probability: percent(
                    daily.precipitation_probability_max[i].unwrap_or(0.0),
                ),
                weather_code: daily.weathercode[i].ok_or_else(|| missing("weathercode"))?,
            })
        })
        .collect()
}

/// Combine several years of archive records into one "typical" day per
/// window date. Dates are labelled with the window's (target) year.
pub fn aggregate_history(
    window: &EventWindow,
    samples: &[YearSample],
    rain_threshold: f64,
) -> Result<Vec<WeatherDay>, WeatherError> {
    if samples.is_empty() {
        return Err(WeatherError::NoHistoryYears);
    }

    let expected = window.day_count();
    for sample in samples {
        let d = &sample.daily;
        for len in [
            d.time.len(),
            d.temperature_2m_max.len(),
            d.temperature_2m_min.len(),
            d.precipitation_sum.len(),
            d.weathercode.len(),
        ] {
            check_len(|| format!("archive {}", sample.year), expected, len)?;
        }
    }

    let mut ordered: Vec<&YearSample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.year);
    let year_count = ordered.len() as f64;

    window
        .days()
        .enumerate()
        .map(|(i, date)| {
            let missing = |field: &'static str| WeatherError::MissingValue { field, date };

            let temp_max = mean(ordered.iter().filter_map(|s| s.daily.temperature_2m_max[i]))
                .ok_or_else(|| missing("temperature_2m_max"))?;
            let temp_min = mean(ordered.iter().filter_map(|s| s.daily.temperature_2m_min[i]))
                .ok_or_else(|| missing("temperature_2m_min"))?;

            let rainy = ordered
                .iter()
                .filter(|s| s.daily.precipitation_sum[i].is_some_and(|p| p > rain_threshold))
                .count();

            let codes: Vec<i32> = ordered
                .iter()
                .filter_map(|s| s.daily.weathercode[i])
                .collect();
            let weather_code = mode_prefer_recent(&codes).ok_or_else(|| missing("weathercode"))?;

            Ok(WeatherDay {
                date,
                temp_max: round_half_up(temp_max),
                temp_min: round_half_up(temp_min),
                precipitation_probability: percent(100.0 * rainy as f64 / year_count),
                weather_code,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::NaiveDate;

    fn window() -> EventWindow {
        EventWindow::resolve("March", "20-22", 2026).unwrap()
    }

    fn restamped_dates(window: &EventWindow, year: i32) -> Vec<NaiveDate> {
        window.with_year(year).unwrap().days().collect()
    }

    fn sample(year: i32, max: [f64; 3], min: [f64; 3], precip: [f64; 3], codes: [i32; 3]) -> YearSample {
        YearSample {
            year,
            daily: ArchiveDaily {
                time: restamped_dates(&window(), year),
                temperature_2m_max: max.iter().copied().map(Some).collect(),
                temperature_2m_min: min.iter().copied().map(Some).collect(),
                precipitation_sum: precip.iter().copied().map(Some).collect(),
                weathercode: codes.iter().copied().map(Some).collect(),
            },
        }
    }

    fn three_years() -> Vec<YearSample> {
        vec![
            sample(2023, [70.0, 68.2, 75.0], [50.0, 49.0, 55.0], [0.0, 5.0, 0.0], [3, 61, 0]),
            sample(2024, [71.0, 69.9, 74.0], [51.0, 47.5, 54.0], [2.5, 0.9, 0.0], [3, 2, 0]),
            sample(2025, [71.0, 70.1, 73.0], [52.0, 48.4, 53.0], [1.2, 1.0, 0.0], [3, 61, 1]),
        ]
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(70.5), 71);
        assert_eq!(round_half_up(70.49), 70);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
    }

    #[test]
    fn test_mode_unanimous() {
        assert_eq!(mode_prefer_recent(&[3, 3, 3]), Some(3));
    }

    #[test]
    fn test_mode_majority() {
        assert_eq!(mode_prefer_recent(&[61, 2, 61]), Some(61));
        assert_eq!(mode_prefer_recent(&[2, 61, 61]), Some(61));
    }

    #[test]
    fn test_mode_tie_prefers_most_recent_year() {
        assert_eq!(mode_prefer_recent(&[0, 1, 2]), Some(2));
        assert_eq!(mode_prefer_recent(&[61, 61, 3, 3]), Some(3));
        assert_eq!(mode_prefer_recent(&[]), None);
    }

    #[test]
    fn test_history_aggregation() {
        let days = aggregate_history(&window(), &three_years(), 1.0).unwrap();

        assert_eq!(days.len(), 3);

        // {70, 71, 71} -> 70.67 -> 71
        assert_eq!(days[0].temp_max, 71);
        assert_eq!(days[0].temp_min, 51);
        // 2 of 3 years above 1.0 -> 67
        assert_eq!(days[0].precipitation_probability, 67);
        assert_eq!(days[0].weather_code, 3);

        // only 2023 above the threshold; 1.0 itself is not rainy
        assert_eq!(days[1].precipitation_probability, 33);
        assert_eq!(days[1].weather_code, 61);
        assert_eq!(days[1].temp_max, 69);

        assert_eq!(days[2].precipitation_probability, 0);
        assert_eq!(days[2].weather_code, 0);
    }

    #[test]
    fn test_history_dates_use_target_year() {
        let days = aggregate_history(&window(), &three_years(), 1.0).unwrap();
        let dates: Vec<_> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2026-03-20", "2026-03-21", "2026-03-22"]);
    }

    #[test]
    fn test_history_sample_order_does_not_matter() {
        let mut samples = three_years();
        samples.reverse();
        let reversed = aggregate_history(&window(), &samples, 1.0).unwrap();
        let ordered = aggregate_history(&window(), &three_years(), 1.0).unwrap();
        assert_eq!(reversed, ordered);
    }

    #[test]
    fn test_history_shape_mismatch() {
        let mut samples = three_years();
        samples[1].daily.temperature_2m_max.pop();

        let result = aggregate_history(&window(), &samples, 1.0);
        match result {
            Err(WeatherError::ShapeMismatch {
                what,
                expected,
                found,
            }) => {
                assert_eq!(what, "archive 2024");
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_history_null_temperature_is_skipped() {
        let mut samples = three_years();
        samples[0].daily.temperature_2m_max[0] = None;

        let days = aggregate_history(&window(), &samples, 1.0).unwrap();
        // mean of {71, 71}
        assert_eq!(days[0].temp_max, 71);
    }

    #[test]
    fn test_history_all_null_temperature() {
        let mut samples = three_years();
        for s in &mut samples {
            s.daily.temperature_2m_min[2] = None;
        }

        assert!(matches!(
            aggregate_history(&window(), &samples, 1.0),
            Err(WeatherError::MissingValue {
                field: "temperature_2m_min",
                ..
            })
        ));
    }

    #[test]
    fn test_history_null_precipitation_is_dry() {
        let mut samples = three_years();
        samples[1].daily.precipitation_sum[0] = None;

        let days = aggregate_history(&window(), &samples, 1.0).unwrap();
        assert_eq!(days[0].precipitation_probability, 33);
    }

    #[test]
    fn test_history_requires_samples() {
        assert!(matches!(
            aggregate_history(&window(), &[], 1.0),
            Err(WeatherError::NoHistoryYears)
        ));
    }

    fn forecast(max: Vec<Option<f64>>) -> ForecastDaily {
        ForecastDaily {
            time: window().days().collect(),
            temperature_2m_max: max,
            temperature_2m_min: vec![Some(50.4), Some(-0.5), Some(48.0)],
            precipitation_probability_max: vec![Some(10.0), Some(45.0), Some(100.0)],
            weathercode: vec![Some(1), Some(61), Some(3)],
        }
    }

    #[test]
    fn test_forecast_days_rounding() {
        let days = forecast_days(forecast(vec![Some(72.5), Some(75.0), Some(69.4)])).unwrap();

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].temp_max, 73);
        assert_eq!(days[0].temp_min, 50);
        assert_eq!(days[1].temp_min, 0);
        assert_eq!(days[2].temp_max, 69);
        assert_eq!(days[1].precipitation_probability, 45);
        assert_eq!(days[1].weather_code, 61);
        assert_eq!(days[2].date.to_string(), "2026-03-22");
    }

    #[test]
    fn test_forecast_min_above_max_passes_through() {
        let mut daily = forecast(vec![Some(40.0), Some(75.0), Some(69.4)]);
        daily.temperature_2m_min[0] = Some(45.0);

        let days = forecast_days(daily).unwrap();
        assert_eq!(days[0].temp_max, 40);
        assert_eq!(days[0].temp_min, 45);
    }

    #[test]
    fn test_forecast_missing_value() {
        let result = forecast_days(forecast(vec![Some(72.5), None, Some(69.4)]));
        assert!(matches!(
            result,
            Err(WeatherError::MissingValue {
                field: "temperature_2m_max",
                ..
            })
        ));
    }

    #[test]
    fn test_forecast_null_probability_reads_as_dry() {
        let mut daily = forecast(vec![Some(72.5), Some(75.0), Some(69.4)]);
        daily.precipitation_probability_max[0] = None;

        let days = forecast_days(daily).unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].precipitation_probability, 0);
        assert_eq!(days[1].precipitation_probability, 45);
    }

    #[test]
    fn test_forecast_shape_mismatch() {
        let result = forecast_days(forecast(vec![Some(72.5), Some(75.0)]));
        assert!(matches!(result, Err(WeatherError::ShapeMismatch { .. })));
    }
}
