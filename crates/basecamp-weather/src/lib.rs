//! Trip weather for Basecamp
//!
//! Resolves a trip's coarse schedule ("March", "20-22") into calendar dates and
//! provides either a live Open-Meteo forecast or a multi-year historical
//! composite for those dates, cached per trip for the life of the process.

pub mod aggregate;
pub mod cache;
pub mod client;
pub mod dates;
pub mod error;
pub mod provider;
pub mod service;
pub mod types;

pub use cache::WeatherCache;
pub use client::{ArchiveDaily, ForecastDaily, OpenMeteoClient};
pub use dates::{Clock, DateError, EventWindow, FixedClock, ForecastRange, SystemClock};
pub use error::{ApiKind, WeatherError};
pub use provider::WeatherProvider;
pub use service::{WeatherHandle, WeatherService};
pub use types::*;
