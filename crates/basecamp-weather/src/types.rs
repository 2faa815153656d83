use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    #[default]
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    LightRain,
    ModerateRain,
    HeavyRain,
    Snow,
    Showers,
    ViolentShowers,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1 | 2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            61 => Self::LightRain,
            63 => Self::ModerateRain,
            65 => Self::HeavyRain,
            71 | 73 | 75 => Self::Snow,
            80 | 81 => Self::Showers,
            82 => Self::ViolentShowers,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::PartlyCloudy, // Unknown codes read as a mixed sky
        }
    }

    /// Translation key for the condition label
    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Clear => "weather.clear",
            Self::PartlyCloudy => "weather.partlyCloudy",
            Self::Overcast => "weather.overcast",
            Self::Fog => "weather.fog",
            Self::Drizzle => "weather.drizzle",
            Self::LightRain => "weather.rainLight",
            Self::ModerateRain => "weather.rainModerate",
            Self::HeavyRain => "weather.rainHeavy",
            Self::Snow => "weather.snow",
            Self::Showers | Self::ViolentShowers => "weather.showers",
            Self::Thunderstorm => "weather.thunderstorm",
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::LightRain => "Light Rain",
            Self::ModerateRain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Showers | Self::ViolentShowers => "Showers",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    /// Icon name used by the trip card
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::PartlyCloudy => "partly-cloudy",
            Self::Overcast => "cloudy",
            Self::Fog => "fog",
            Self::Drizzle => "drizzle",
            Self::LightRain | Self::ModerateRain => "rain",
            Self::HeavyRain | Self::ViolentShowers => "heavy-rain",
            Self::Snow => "snow",
            Self::Showers => "showers",
            Self::Thunderstorm => "thunderstorm",
        }
    }
}

/// Geographic location of a trip's campsite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Everything needed to look up weather for one trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWeatherRequest {
    pub event_id: String,
    pub coordinates: Coordinates,
    /// Full English month name, e.g. "March"
    pub month: String,
    /// "D" or "D-D", e.g. "20-22"
    pub dates: String,
}

impl EventWeatherRequest {
    pub fn new(
        event_id: impl Into<String>,
        coordinates: Coordinates,
        month: impl Into<String>,
        dates: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            coordinates,
            month: month.into(),
            dates: dates.into(),
        }
    }

    /// True when both requests describe the same place and schedule
    pub fn same_inputs(&self, other: &EventWeatherRequest) -> bool {
        self.coordinates == other.coordinates
            && self.month == other.month
            && self.dates == other.dates
    }
}

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    /// Retrieved for the real trip dates
    Forecast,
    /// Synthesized from prior years' records for the same calendar window
    Historical,
}

impl std::fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forecast => write!(f, "forecast"),
            Self::Historical => write!(f, "historical"),
        }
    }
}

/// One calendar day's summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub temp_max: i32,
    pub temp_min: i32,
    /// Percent, 0-100
    pub precipitation_probability: u8,
    /// WMO condition code
    pub weather_code: i32,
}

impl WeatherDay {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.weather_code)
    }
}

/// Resolved weather for one trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherData {
    #[serde(rename = "type")]
    pub kind: WeatherKind,
    /// One entry per trip day, in chronological order
    pub days: Vec<WeatherDay>,
}

/// Tri-state view handed to display code
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherState {
    pub weather: Option<WeatherData>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl WeatherState {
    pub fn loading() -> Self {
        Self {
            weather: None,
            is_loading: true,
            error: None,
        }
    }

    pub fn ready(data: WeatherData) -> Self {
        Self {
            weather: Some(data),
            is_loading: false,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            weather: None,
            is_loading: false,
            error: Some(message.into()),
        }
    }

    /// Whether the widget should render at all (errors hide it)
    pub fn is_visible(&self) -> bool {
        self.is_loading || self.weather.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(WeatherCondition::from_wmo_code(0), WeatherCondition::Clear);
    }

    #[test]
    fn test_wmo_code_partly_cloudy() {
        assert_eq!(WeatherCondition::from_wmo_code(1), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo_code(2), WeatherCondition::PartlyCloudy);
    }

    #[test]
    fn test_wmo_code_rain_intensity() {
        assert_eq!(WeatherCondition::from_wmo_code(61), WeatherCondition::LightRain);
        assert_eq!(WeatherCondition::from_wmo_code(63), WeatherCondition::ModerateRain);
        assert_eq!(WeatherCondition::from_wmo_code(65), WeatherCondition::HeavyRain);
    }

    #[test]
    fn test_wmo_code_showers() {
        assert_eq!(WeatherCondition::from_wmo_code(80), WeatherCondition::Showers);
        assert_eq!(WeatherCondition::from_wmo_code(81), WeatherCondition::Showers);
        assert_eq!(WeatherCondition::from_wmo_code(82), WeatherCondition::ViolentShowers);
    }

    #[test]
    fn test_wmo_code_thunderstorm() {
        assert_eq!(WeatherCondition::from_wmo_code(95), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wmo_code(96), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wmo_code(99), WeatherCondition::Thunderstorm);
    }

    #[test]
    fn test_wmo_code_unknown_defaults_to_partly_cloudy() {
        assert_eq!(WeatherCondition::from_wmo_code(77), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo_code(-1), WeatherCondition::PartlyCloudy);
    }

    #[test]
    fn test_violent_showers_share_label_but_not_icon() {
        let c = WeatherCondition::ViolentShowers;
        assert_eq!(c.label_key(), WeatherCondition::Showers.label_key());
        assert_eq!(c.icon(), "heavy-rain");
    }

    #[test]
    fn test_weather_data_serializes_type_field() {
        let data = WeatherData {
            kind: WeatherKind::Historical,
            days: vec![WeatherDay {
                date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
                temp_max: 71,
                temp_min: 50,
                precipitation_probability: 67,
                weather_code: 3,
            }],
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], "historical");
        assert_eq!(json["days"][0]["date"], "2026-03-20");
        assert_eq!(json["days"][0]["tempMax"], 71);
        assert_eq!(json["days"][0]["precipitationProbability"], 67);
    }

    #[test]
    fn test_state_visibility() {
        assert!(WeatherState::loading().is_visible());
        assert!(!WeatherState::failed("Forecast API error: 500").is_visible());
        assert!(!WeatherState::default().is_visible());
    }

    #[test]
    fn test_same_inputs_ignores_event_id() {
        let coords = Coordinates::new(31.02, -98.44);
        let a = EventWeatherRequest::new("a", coords, "March", "20-22");
        let b = EventWeatherRequest::new("b", coords, "March", "20-22");
        let c = EventWeatherRequest::new("a", coords, "March", "21-23");
        assert!(a.same_inputs(&b));
        assert!(!a.same_inputs(&c));
    }
}
