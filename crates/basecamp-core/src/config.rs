use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Earliest year the Open-Meteo archive has data for.
const ARCHIVE_FIRST_YEAR: i32 = 1940;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Trip catalog settings
    #[serde(default)]
    pub trips: TripsConfig,
}

/// Temperature unit sent to the weather API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Value of the `temperature_unit` query parameter
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }

    /// Short suffix for display ("°F")
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Calendar year every trip schedule is resolved against
    pub event_year: i32,

    /// IANA timezone the API reports days in
    pub timezone: String,

    /// Temperature unit preference
    pub temperature_unit: TemperatureUnit,

    /// Short-range forecast endpoint
    pub forecast_url: String,

    /// Historical archive endpoint
    pub archive_url: String,

    /// How many days after a trip started the live forecast is still used
    pub forecast_past_days: i64,

    /// How many days ahead the live forecast reaches
    pub forecast_horizon_days: i64,

    /// Number of prior calendar years averaged on the historical path
    pub history_years: u32,

    /// Daily precipitation sum above which an archive day counts as rainy
    pub rain_threshold: f64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            event_year: 2026,
            timezone: "America/Chicago".to_string(),
            temperature_unit: TemperatureUnit::Fahrenheit,
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            archive_url: "https://archive-api.open-meteo.com/v1/archive".to_string(),
            forecast_past_days: 3,
            forecast_horizon_days: 16,
            history_years: 3,
            rain_threshold: 1.0,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripsConfig {
    /// TOML trip catalog; the built-in catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("basecamp");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            trips: TripsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        let weather = &self.weather;

        self.validate_url(&weather.forecast_url, "weather.forecast_url", &mut result);
        self.validate_url(&weather.archive_url, "weather.archive_url", &mut result);

        if weather.timezone.trim().is_empty() {
            result.add_error("weather.timezone", "Timezone must not be empty");
        }

        if weather.history_years == 0 {
            result.add_error(
                "weather.history_years",
                "At least one history year is required",
            );
        } else if weather.history_years > 10 {
            result.add_warning(
                "weather.history_years",
                "More than 10 history years makes every historical lookup slow",
            );
        }

        if weather.event_year - (weather.history_years as i32) < ARCHIVE_FIRST_YEAR {
            result.add_error(
                "weather.event_year",
                format!("History years must not reach before {}", ARCHIVE_FIRST_YEAR),
            );
        }

        if weather.forecast_past_days < 0 {
            result.add_error(
                "weather.forecast_past_days",
                "Past days must not be negative",
            );
        }

        if weather.forecast_horizon_days < 0 {
            result.add_error(
                "weather.forecast_horizon_days",
                "Forecast horizon must not be negative",
            );
        } else if weather.forecast_horizon_days > 16 {
            result.add_warning(
                "weather.forecast_horizon_days",
                "The forecast API only covers 16 days ahead",
            );
        }

        if !weather.rain_threshold.is_finite() || weather.rain_threshold < 0.0 {
            result.add_error(
                "weather.rain_threshold",
                "Rain threshold must be a non-negative number",
            );
        }

        if weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if let Some(path) = &self.trips.catalog_path {
            if !path.exists() {
                result.add_warning(
                    "trips.catalog_path",
                    format!("Path does not exist: {}", path.display()),
                );
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                // Check scheme
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                // Check host
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("basecamp");

        Ok(config_dir.join("config.toml"))
    }
}
