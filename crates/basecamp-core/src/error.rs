//! Error categories shared by the Basecamp crates.
//!
//! The weather and trip crates keep their own detailed error enums and convert
//! into [`AppError`] at the point where a failure is reported, so every
//! failure has a short message fit for a trip card or the command line.

use thiserror::Error;

/// Top-level error for anything shown to a visitor.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything without a more specific category
    #[error("Service error: {0}")]
    Service(String),
}

impl AppError {
    /// Short display message; the `Display` text carries the detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Io(_) => "A local file could not be read.",
            AppError::Service(_) => "Something went wrong. Please try again.",
        }
    }
}

/// Failures talking to the weather service.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => "Weather is unavailable while offline.",
            NetworkError::Timeout => "The weather service took too long to answer.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is having trouble. Try again later."
            }
            NetworkError::ServerError { .. } => "Weather is not available for these dates.",
            NetworkError::InvalidResponse(_) => "The weather service sent data we could not read.",
        }
    }
}

/// Bad settings or a bad trip catalog file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not parse {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "A setting is invalid. Check config.toml.",
            ConfigError::ParseError(_) => "A settings file is malformed.",
        }
    }
}

/// Weather could not be produced for a trip.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid trip schedule: {0}")]
    InvalidSchedule(String),

    #[error("Weather data unavailable: {0}")]
    DataUnavailable(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::InvalidSchedule(_) => "Trip dates are not set yet.",
            WeatherError::DataUnavailable(_) => "Weather is not available for these dates.",
        }
    }
}

/// Classify a reqwest failure.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors: Vec<AppError> = vec![
            NetworkError::Timeout.into(),
            NetworkError::ConnectionFailed("refused".into()).into(),
            ConfigError::Invalid("history_years".into()).into(),
            ConfigError::ParseError("catalog.toml".into()).into(),
            WeatherError::InvalidSchedule("June".into()).into(),
            WeatherError::DataUnavailable("archive 2024".into()).into(),
            AppError::Service("test".into()),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {:?}", err);
        }
    }

    #[test]
    fn test_schedule_message() {
        let app_err: AppError = WeatherError::InvalidSchedule("Trip dates are empty".into()).into();
        assert_eq!(app_err.user_message(), "Trip dates are not set yet.");
        assert_eq!(
            app_err.to_string(),
            "Weather error: Invalid trip schedule: Trip dates are empty"
        );
    }

    #[test]
    fn test_server_error_messages_by_status() {
        let outage = AppError::Network(NetworkError::ServerError {
            status: 503,
            message: "Forecast API error".into(),
        });
        assert_eq!(
            outage.user_message(),
            "The weather service is having trouble. Try again later."
        );

        let rejected = NetworkError::ServerError {
            status: 400,
            message: "Archive API error".into(),
        };
        assert_eq!(
            rejected.user_message(),
            "Weather is not available for these dates."
        );
    }
}
