use basecamp_weather::{Coordinates, EventWeatherRequest};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TripError;

/// A scheduled (or not yet scheduled) camping weekend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub park_name: String,
    pub location: String,
    /// Full English month name
    pub month: String,
    /// "D" or "D-D"; empty until the trip is scheduled
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub available_spots: u32,
    pub total_spots: u32,
    #[serde(default)]
    pub is_sold_out: bool,
    #[serde(default)]
    pub park_website: String,
    #[serde(default)]
    pub google_maps_url: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    /// Free text such as "Water & Electric"
    #[serde(default)]
    pub campsite_type: String,
}

impl Trip {
    pub fn is_scheduled(&self) -> bool {
        !self.dates.trim().is_empty()
    }

    pub fn is_available(&self) -> bool {
        !self.is_sold_out
    }

    /// "March 20-22", or just the month when no dates are set
    pub fn display_dates(&self) -> String {
        if self.is_scheduled() {
            format!("{} {}", self.month, self.dates.trim())
        } else {
            self.month.clone()
        }
    }

    /// Weather lookup for this trip. `None` when the trip has no location or
    /// no dates yet, in which case no weather is shown.
    pub fn weather_request(&self) -> Option<EventWeatherRequest> {
        let coordinates = self.coordinates?;
        if !self.is_scheduled() {
            return None;
        }
        Some(EventWeatherRequest::new(
            self.id.clone(),
            coordinates,
            self.month.clone(),
            self.dates.clone(),
        ))
    }

    /// Prefilled WhatsApp message asking to book this trip
    pub fn booking_message(&self) -> String {
        format!(
            "Hi! I'd like to book the {} trip ({}).",
            self.park_name,
            self.display_dates()
        )
    }
}

/// Rental package offered with every trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    /// Whole US dollars
    pub price: u32,
    #[serde(default)]
    pub original_price: Option<u32>,
    pub duration: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

impl Package {
    pub fn savings(&self) -> Option<u32> {
        self.original_price
            .and_then(|original| original.checked_sub(self.price))
            .filter(|s| *s > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppContact {
    pub name: String,
    /// Digits only, with country code
    pub phone: String,
    pub display_phone: String,
}

impl WhatsAppContact {
    /// `https://wa.me/<phone>?text=<message>`
    pub fn booking_link(&self, message: &str) -> Result<Url, TripError> {
        let base = format!("https://wa.me/{}", self.phone);
        Ok(Url::parse_with_params(&base, &[("text", message)])?)
    }
}
