//! Weather-specific error types.

use basecamp_core::{AppError, NetworkError, ReqwestErrorExt};
use chrono::NaiveDate;
use thiserror::Error;

use crate::dates::DateError;

/// Which Open-Meteo endpoint a request went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    Forecast,
    Archive,
}

impl std::fmt::Display for ApiKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forecast => write!(f, "Forecast"),
            Self::Archive => write!(f, "Archive"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid trip schedule: {0}")]
    Schedule(#[from] DateError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{api} API error: {status}")]
    Api { api: ApiKind, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{what} returned {found} days, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("Missing {field} for {date}")]
    MissingValue { field: &'static str, date: NaiveDate },

    #[error("No history years configured")]
    NoHistoryYears,

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl WeatherError {
    /// Whether a later attempt could succeed without any input changing.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        use basecamp_core::{ConfigError, WeatherError as CoreWeatherError};

        match e {
            WeatherError::Schedule(d) => {
                AppError::Weather(CoreWeatherError::InvalidSchedule(d.to_string()))
            }
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Api { api, status } => AppError::Network(NetworkError::ServerError {
                status,
                message: format!("{} API error", api),
            }),
            WeatherError::Parse(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
            e @ (WeatherError::ShapeMismatch { .. }
            | WeatherError::MissingValue { .. }
            | WeatherError::NoHistoryYears) => {
                AppError::Weather(CoreWeatherError::DataUnavailable(e.to_string()))
            }
            WeatherError::Url(e) => AppError::Config(ConfigError::Invalid(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_embeds_status() {
        let err = WeatherError::Api {
            api: ApiKind::Forecast,
            status: 503,
        };
        assert_eq!(err.to_string(), "Forecast API error: 503");

        let err = WeatherError::Api {
            api: ApiKind::Archive,
            status: 400,
        };
        assert_eq!(err.to_string(), "Archive API error: 400");
    }

    #[test]
    fn test_is_retryable() {
        assert!(WeatherError::Api {
            api: ApiKind::Forecast,
            status: 502
        }
        .is_retryable());
        assert!(!WeatherError::Api {
            api: ApiKind::Forecast,
            status: 400
        }
        .is_retryable());
        assert!(!WeatherError::Schedule(DateError::EmptyDates).is_retryable());
    }

    #[test]
    fn test_conversion_to_app_error() {
        let app: AppError = WeatherError::Schedule(DateError::EmptyDates).into();
        assert!(matches!(
            app,
            AppError::Weather(basecamp_core::WeatherError::InvalidSchedule(_))
        ));

        let app: AppError = WeatherError::Api {
            api: ApiKind::Archive,
            status: 500,
        }
        .into();
        assert!(matches!(
            app,
            AppError::Network(NetworkError::ServerError { status: 500, .. })
        ));

        let app: AppError = WeatherError::ShapeMismatch {
            what: "archive 2024".into(),
            expected: 3,
            found: 2,
        }
        .into();
        assert!(matches!(
            app,
            AppError::Weather(basecamp_core::WeatherError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_missing_history_message() {
        let app: AppError = WeatherError::NoHistoryYears.into();
        assert_eq!(app.user_message(), "Weather is not available for these dates.");
    }
}
